/// Shared data types for the battery telemetry pipeline.
///
/// Every stage owns the value it produces and hands it to the next stage by
/// value or shared reference; nothing here is mutated after construction.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Channels
// ---------------------------------------------------------------------------

/// The two quantities the shunt logger records, one file per quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Signed current in amperes; positive is discharge.
    Current,
    /// Pack voltage in volts.
    Voltage,
}

impl ChannelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Current => "current",
            ChannelKind::Voltage => "voltage",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            ChannelKind::Current => "A",
            ChannelKind::Voltage => "V",
        }
    }

    /// File name prefix used by the logger ("Amps 2024-05-01.txt").
    pub fn default_prefix(&self) -> &'static str {
        match self {
            ChannelKind::Current => "Amps",
            ChannelKind::Voltage => "Volts",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reconstructed reading: a time of day with second resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: NaiveTime,
    pub value: f64,
}

/// A reconstructed per-second series for a single quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub kind: ChannelKind,
    pub samples: Vec<Sample>,
}

impl Channel {
    pub fn new(kind: ChannelKind, samples: Vec<Sample>) -> Self {
        Self { kind, samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Aligned output
// ---------------------------------------------------------------------------

/// How the two channels were combined into rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentMode {
    /// Inner join on identical `HH:MM:SS` keys.
    Exact,
    /// No key overlap: rows paired by index, truncated to the shorter channel.
    Positional,
    /// Voltage channel absent; voltage zero-filled.
    CurrentOnly,
    /// Current channel absent; current zero-filled.
    VoltageOnly,
}

impl AlignmentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlignmentMode::Exact => "exact",
            AlignmentMode::Positional => "positional (degraded)",
            AlignmentMode::CurrentOnly => "current only",
            AlignmentMode::VoltageOnly => "voltage only",
        }
    }

    pub fn is_degraded(&self) -> bool {
        *self == AlignmentMode::Positional
    }
}

impl fmt::Display for AlignmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedRow {
    pub timestamp: NaiveDateTime,
    pub current: f64,
    pub voltage: f64,
}

/// Timestamp-synchronized rows of current and voltage for one date.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSeries {
    pub date: NaiveDate,
    pub mode: AlignmentMode,
    pub rows: Vec<AlignedRow>,
}

impl AlignedSeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        self.rows.iter().map(|r| r.timestamp).collect()
    }

    pub fn currents(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.current).collect()
    }

    pub fn voltages(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.voltage).collect()
    }
}

/// Cumulative discharged ampere-hours, one entry per aligned row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapacityCurve {
    pub values: Vec<f64>,
}

impl CapacityCurve {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Final cumulative value, or 0 for an empty curve.
    pub fn total_ah(&self) -> f64 {
        self.values.last().copied().unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Terminal ingestion failures. Recoverable problems (bad tokens, bad
/// anchors) never surface here; they are logged and skipped by the decoder.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no valid data found in file: {0}")]
    NoData(PathBuf),

    #[error("no data files found for date {date} in directory {dir} or parent directory")]
    NoChannels { date: NaiveDate, dir: PathBuf },

    #[error("no channel data available to align for {0}")]
    NothingToAlign(NaiveDate),

    #[error("channel loader stopped before reporting: {0}")]
    Worker(String),
}
