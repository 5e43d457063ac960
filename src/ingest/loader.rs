/// One-shot channel file loading: read, decode, reconstruct.

use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::ingest::decoder::{decode_text, DecodeReport};
use crate::ingest::reconstruct::reconstruct;
use crate::model::{Channel, ChannelKind, IngestError};

/// Decodes and reconstructs already-loaded text.
///
/// # Errors
/// `IngestError::NoData` when the text yields no timestamp/value pairs.
pub fn channel_from_text(kind: ChannelKind, text: &str, source: &Path) -> Result<Channel, IngestError> {
    let report = decode_text(text);
    log_report(kind, source, &report);

    if report.value_count() == 0 {
        return Err(IngestError::NoData(source.to_path_buf()));
    }

    Ok(reconstruct(kind, &report.blocks))
}

/// Loads one channel file in a single read.
///
/// # Errors
/// - `IngestError::Io` — the file could not be read.
/// - `IngestError::NoData` — the file holds no usable samples.
pub fn load_channel(kind: ChannelKind, path: &Path) -> Result<Channel, IngestError> {
    info!("Loading {} data from: {}", kind, path.display());

    let text = fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let channel = channel_from_text(kind, &text, path)?;
    info!("{} channel: {} samples", kind, channel.len());
    Ok(channel)
}

fn log_report(kind: ChannelKind, source: &Path, report: &DecodeReport) {
    let skipped = report.skipped_lines + report.unanchored_lines;
    if skipped > 0 || report.skipped_tokens > 0 {
        warn!(
            "{} ({}): skipped {} lines and {} values",
            source.display(),
            kind,
            skipped,
            report.skipped_tokens
        );
    }
}
