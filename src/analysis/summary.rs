/// Summary scalars for one analysed date.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::model::{AlignedSeries, AlignmentMode, CapacityCurve};

/// Readings at or below this magnitude are treated as "no signal" when
/// deciding whether a channel carries real data.
pub const PRESENCE_THRESHOLD: f64 = 0.001;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub alignment: AlignmentMode,
    pub rows: usize,
    pub first_timestamp: Option<NaiveDateTime>,
    pub last_timestamp: Option<NaiveDateTime>,
    pub max_current_a: f64,
    pub min_current_a: f64,
    pub max_voltage_v: f64,
    pub min_voltage_v: f64,
    pub final_capacity_ah: f64,
    pub has_current_data: bool,
    pub has_voltage_data: bool,
}

/// (min, max) of a column; (0, 0) when empty.
fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .unwrap_or((0.0, 0.0))
}

pub fn has_signal(values: impl IntoIterator<Item = f64>) -> bool {
    values.into_iter().any(|v| v.abs() > PRESENCE_THRESHOLD)
}

pub fn summarize(series: &AlignedSeries, capacity: &CapacityCurve) -> DaySummary {
    let (min_current_a, max_current_a) = min_max(series.rows.iter().map(|r| r.current));
    let (min_voltage_v, max_voltage_v) = min_max(series.rows.iter().map(|r| r.voltage));

    DaySummary {
        date: series.date,
        alignment: series.mode,
        rows: series.len(),
        first_timestamp: series.rows.first().map(|r| r.timestamp),
        last_timestamp: series.rows.last().map(|r| r.timestamp),
        max_current_a,
        min_current_a,
        max_voltage_v,
        min_voltage_v,
        final_capacity_ah: capacity.total_ah(),
        has_current_data: has_signal(series.rows.iter().map(|r| r.current)),
        has_voltage_data: has_signal(series.rows.iter().map(|r| r.voltage)),
    }
}
