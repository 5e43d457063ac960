/// Channel alignment: current + voltage → timestamp-synchronized rows.
///
/// The two channels come from separate files written by separate logger
/// passes, so their second boundaries only line up when both were recorded
/// in the same minutes. Join keys are `HH:MM:SS` strings; the date and any
/// sub-second part never take part in matching.
///
/// Outcomes, in order of preference:
/// 1. `Exact` — inner join on keys, in current-channel order.
/// 2. `Positional` — no key overlap at all: pair by index, truncated to
///    the shorter channel. Channels with different start offsets end up
///    misaligned; the mode is surfaced so callers can flag it.
/// 3. `CurrentOnly` / `VoltageOnly` — one channel missing or empty; the
///    other channel's timestamps are used and the missing values are 0.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::{info, warn};

use crate::model::{AlignedRow, AlignedSeries, AlignmentMode, Channel, IngestError, Sample};

/// Join key for a sample time.
pub fn time_key(time: NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

/// Key → value map for a channel. A repeated key keeps its last value.
fn key_map(samples: &[Sample]) -> HashMap<String, f64> {
    samples.iter().map(|s| (time_key(s.time), s.value)).collect()
}

fn at_date(date: NaiveDate, time: NaiveTime) -> NaiveDateTime {
    NaiveDateTime::new(date, time)
}

// ---------------------------------------------------------------------------
// Join strategies
// ---------------------------------------------------------------------------

/// Inner join on `HH:MM:SS` keys, in the order of `current`.
///
/// Each key is emitted at most once so the rows stay strictly increasing
/// even if a malformed file repeats a minute.
pub fn exact_join(current: &[Sample], voltage: &[Sample], date: NaiveDate) -> Vec<AlignedRow> {
    let current_map = key_map(current);
    let voltage_map = key_map(voltage);
    let mut emitted: HashSet<String> = HashSet::new();
    let mut rows = Vec::new();

    for sample in current {
        let key = time_key(sample.time);
        if let (Some(&c), Some(&v)) = (current_map.get(&key), voltage_map.get(&key)) {
            if emitted.insert(key) {
                rows.push(AlignedRow {
                    timestamp: at_date(date, sample.time),
                    current: c,
                    voltage: v,
                });
            }
        }
    }

    rows
}

/// Index pairing, truncated to the shorter channel; uses current's times.
pub fn positional_join(current: &[Sample], voltage: &[Sample], date: NaiveDate) -> Vec<AlignedRow> {
    current
        .iter()
        .zip(voltage.iter())
        .map(|(c, v)| AlignedRow {
            timestamp: at_date(date, c.time),
            current: c.value,
            voltage: v.value,
        })
        .collect()
}

fn zero_filled<F>(samples: &[Sample], date: NaiveDate, row: F) -> Vec<AlignedRow>
where
    F: Fn(NaiveDateTime, f64) -> AlignedRow,
{
    samples
        .iter()
        .map(|s| row(at_date(date, s.time), s.value))
        .collect()
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Aligns the two channels for `date`.
///
/// Either channel may be absent (`None`) or empty; both are treated the
/// same way.
///
/// # Errors
/// `IngestError::NothingToAlign` when neither channel has samples.
pub fn align_channels(
    current: Option<&Channel>,
    voltage: Option<&Channel>,
    date: NaiveDate,
) -> Result<AlignedSeries, IngestError> {
    let current = current.filter(|c| !c.is_empty());
    let voltage = voltage.filter(|v| !v.is_empty());

    let (mode, rows) = match (current, voltage) {
        (Some(c), Some(v)) => {
            let rows = exact_join(&c.samples, &v.samples, date);
            if rows.is_empty() {
                warn!("No exact timestamp matches between current and voltage files.");
                warn!(
                    "Degraded alignment: pairing by position ({} current, {} voltage samples).",
                    c.len(),
                    v.len()
                );
                (
                    AlignmentMode::Positional,
                    positional_join(&c.samples, &v.samples, date),
                )
            } else {
                info!(
                    "Exact alignment: {} of {} current samples matched voltage",
                    rows.len(),
                    c.len()
                );
                (AlignmentMode::Exact, rows)
            }
        }
        (Some(c), None) => {
            warn!("No voltage data available for alignment; voltage set to 0");
            let rows = zero_filled(&c.samples, date, |timestamp, current| AlignedRow {
                timestamp,
                current,
                voltage: 0.0,
            });
            (AlignmentMode::CurrentOnly, rows)
        }
        (None, Some(v)) => {
            warn!("No current data available for alignment; current set to 0");
            let rows = zero_filled(&v.samples, date, |timestamp, voltage| AlignedRow {
                timestamp,
                current: 0.0,
                voltage,
            });
            (AlignmentMode::VoltageOnly, rows)
        }
        (None, None) => return Err(IngestError::NothingToAlign(date)),
    };

    Ok(AlignedSeries { date, mode, rows })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
