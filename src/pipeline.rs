/// End-to-end analysis of one date's telemetry.
///
/// 1. Load the current and voltage files (concurrently, they share nothing)
/// 2. Align the two channels on their time keys
/// 3. Integrate discharge current into a capacity curve
/// 4. Summarize for the report
///
/// Any terminal ingestion failure aborts the whole date: a file that exists
/// but holds no samples is an error, not a missing channel.

use std::path::PathBuf;
use std::sync::mpsc;

use chrono::NaiveDate;
use log::{debug, info};
use threadpool::ThreadPool;

use crate::analysis::{align_channels, capacity_for_series, summarize, DaySummary};
use crate::discovery::DayFiles;
use crate::ingest::load_channel;
use crate::model::{AlignedSeries, CapacityCurve, Channel, ChannelKind, IngestError};

/// Everything the presentation layer needs for one date.
#[derive(Debug, Clone)]
pub struct DayAnalysis {
    pub series: AlignedSeries,
    pub capacity: CapacityCurve,
    pub summary: DaySummary,
}

type LoadResult = (ChannelKind, Result<Channel, IngestError>);

/// Loads every present channel file on its own worker.
fn load_channels(files: &DayFiles) -> Result<(Option<Channel>, Option<Channel>), IngestError> {
    let jobs: Vec<(ChannelKind, PathBuf)> = [ChannelKind::Current, ChannelKind::Voltage]
        .into_iter()
        .filter_map(|kind| files.path(kind).map(|p| (kind, p.to_path_buf())))
        .collect();

    let pool = ThreadPool::new(jobs.len().max(1));
    let (tx, rx) = mpsc::channel::<LoadResult>();
    let expected = jobs.len();

    for (kind, path) in jobs {
        let tx = tx.clone();
        pool.execute(move || {
            let result = load_channel(kind, &path);
            // Receiver is gone only if an earlier channel already failed.
            let _ = tx.send((kind, result));
        });
    }
    drop(tx);

    let mut current = None;
    let mut voltage = None;
    let mut received = 0;

    for (kind, result) in rx.iter() {
        received += 1;
        let channel = result?;
        debug!("{} channel loaded ({} samples)", kind, channel.len());
        match kind {
            ChannelKind::Current => current = Some(channel),
            ChannelKind::Voltage => voltage = Some(channel),
        }
    }

    if received != expected {
        return Err(IngestError::Worker(format!(
            "{} of {} channel loads reported",
            received, expected
        )));
    }

    Ok((current, voltage))
}

/// Runs the full pipeline on already-loaded channels.
///
/// # Errors
/// `IngestError::NothingToAlign` when neither channel has samples.
pub fn analyze_channels(
    current: Option<&Channel>,
    voltage: Option<&Channel>,
    date: NaiveDate,
) -> Result<DayAnalysis, IngestError> {
    let series = align_channels(current, voltage, date)?;
    let capacity = capacity_for_series(&series);
    let summary = summarize(&series, &capacity);

    info!(
        "{}: {} aligned rows ({}), {:.3} Ah discharged",
        date,
        series.len(),
        series.mode,
        capacity.total_ah()
    );

    Ok(DayAnalysis {
        series,
        capacity,
        summary,
    })
}

/// Loads and analyses one date's files.
///
/// # Errors
/// - `IngestError::Io` / `IngestError::NoData` from either channel file.
/// - `IngestError::NothingToAlign` if neither file was supplied.
/// - `IngestError::Worker` if a loader thread died without reporting.
pub fn analyze_day(files: &DayFiles) -> Result<DayAnalysis, IngestError> {
    let (current, voltage) = load_channels(files)?;
    analyze_channels(current.as_ref(), voltage.as_ref(), files.date)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
