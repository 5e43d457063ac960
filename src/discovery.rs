/// Date directory discovery and channel file resolution.
///
/// Expected layout, as copied off the logger's SD card:
///
/// ```text
/// <base_dir>/
/// ├── 2024-05-01/
/// │   ├── Amps 2024-05-01.txt
/// │   └── Volts 2024-05-01.txt
/// └── 2024-05-02/
///     └── Amps.txt                  (same-directory fallback name)
/// ```
///
/// A channel file is the first existing candidate of:
/// 1. `<dir>/<prefix> <date>.txt`
/// 2. `<dir>/<prefix>.txt`
/// 3. `<parent of dir>/<prefix> <date>.txt`

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{info, warn};

use crate::config::DataConfig;
use crate::model::{ChannelKind, IngestError};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A date directory under the base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateDir {
    pub date: NaiveDate,
    pub path: PathBuf,
}

/// Resolved inputs for one date. At least one channel file is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayFiles {
    pub date: NaiveDate,
    pub dir: PathBuf,
    pub current: Option<PathBuf>,
    pub voltage: Option<PathBuf>,
}

impl DayFiles {
    pub fn path(&self, kind: ChannelKind) -> Option<&Path> {
        match kind {
            ChannelKind::Current => self.current.as_deref(),
            ChannelKind::Voltage => self.voltage.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Date directories
// ---------------------------------------------------------------------------

/// Lists `YYYY-MM-DD` directories under `base_dir`, sorted by date.
///
/// A missing base directory yields an empty list. Files and directories
/// whose names are not dates are ignored.
pub fn find_date_directories(base_dir: &Path) -> Vec<DateDir> {
    let entries = match fs::read_dir(base_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Base directory '{}' is not readable: {}", base_dir.display(), e);
            return Vec::new();
        }
    };

    let mut dirs: Vec<DateDir> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            let name = entry.file_name();
            let date = NaiveDate::parse_from_str(name.to_str()?, DATE_FORMAT).ok()?;
            Some(DateDir {
                date,
                path: entry.path(),
            })
        })
        .collect();

    dirs.sort_by_key(|d| d.date);
    dirs
}

/// Picks the directory for `requested`, falling back to the latest date
/// when no request is given, the request does not parse, or no directory
/// matches. Returns `None` only when `dirs` is empty.
pub fn select_date<'a>(dirs: &'a [DateDir], requested: Option<&str>) -> Option<&'a DateDir> {
    let latest = dirs.last()?;

    let Some(requested) = requested else {
        return Some(latest);
    };

    match NaiveDate::parse_from_str(requested.trim(), DATE_FORMAT) {
        Ok(date) => match dirs.iter().find(|d| d.date == date) {
            Some(dir) => Some(dir),
            None => {
                warn!("No data found for date {}. Using the latest date ({}) instead.", date, latest.date);
                Some(latest)
            }
        },
        Err(_) => {
            warn!(
                "Invalid date format '{}'. Please use YYYY-MM-DD. Using the latest date ({}) instead.",
                requested, latest.date
            );
            Some(latest)
        }
    }
}

// ---------------------------------------------------------------------------
// Channel files
// ---------------------------------------------------------------------------

/// Candidate paths for one channel, in lookup order.
pub fn channel_file_candidates(dir: &Path, date: NaiveDate, prefix: &str) -> Vec<PathBuf> {
    let dated_name = format!("{} {}.txt", prefix, date.format(DATE_FORMAT));
    let mut candidates = vec![dir.join(&dated_name), dir.join(format!("{}.txt", prefix))];
    if let Some(parent) = dir.parent() {
        candidates.push(parent.join(&dated_name));
    }
    candidates
}

/// First existing candidate for one channel.
pub fn resolve_channel_file(dir: &Path, date: NaiveDate, prefix: &str) -> Option<PathBuf> {
    let candidates = channel_file_candidates(dir, date, prefix);
    let found = candidates.iter().position(|p| p.is_file())?;
    if found > 0 {
        info!("Using fallback file: {}", candidates[found].display());
    }
    candidates.into_iter().nth(found)
}

/// Resolves both channel files for a date directory.
///
/// # Errors
/// `IngestError::NoChannels` when neither channel has a file.
pub fn resolve_day_files(date_dir: &DateDir, data: &DataConfig) -> Result<DayFiles, IngestError> {
    let lookup = |kind: ChannelKind| {
        let found = resolve_channel_file(&date_dir.path, date_dir.date, data.prefix(kind));
        if found.is_none() {
            warn!("No {} data file found for date {}", kind, date_dir.date);
        }
        found
    };

    let current = lookup(ChannelKind::Current);
    let voltage = lookup(ChannelKind::Voltage);

    if current.is_none() && voltage.is_none() {
        return Err(IngestError::NoChannels {
            date: date_dir.date,
            dir: date_dir.path.clone(),
        });
    }

    Ok(DayFiles {
        date: date_dir.date,
        dir: date_dir.path.clone(),
        current,
        voltage,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
