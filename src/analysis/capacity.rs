/// Cumulative discharge capacity (ampere-hours).
///
/// Left Riemann sum over the aligned timestamps: each interval
/// `[t[i-1], t[i]]` is charged at the current measured at its start, and
/// only strictly positive (discharge) current counts. Intervals keep their
/// real length; nothing is resampled to a fixed step.

use chrono::NaiveDateTime;

use crate::model::{AlignedSeries, CapacityCurve};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Ah contributed by one interval.
fn interval_ah(start_current: f64, start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    let dt_hours = (end - start).num_seconds() as f64 / SECONDS_PER_HOUR;
    // A backwards step only happens with malformed input; it adds nothing.
    if start_current > 0.0 && dt_hours > 0.0 {
        start_current * dt_hours
    } else {
        0.0
    }
}

/// Integrates `current` over `timestamps`.
///
/// The curve has one entry per position (the shorter of the two inputs),
/// starts at 0 and never decreases. Empty input gives an empty curve.
pub fn cumulative_capacity(timestamps: &[NaiveDateTime], current: &[f64]) -> CapacityCurve {
    let n = timestamps.len().min(current.len());
    if n == 0 {
        return CapacityCurve::default();
    }

    let mut values = Vec::with_capacity(n);
    values.push(0.0);

    for i in 1..n {
        let prev_total = values[i - 1];
        values.push(prev_total + interval_ah(current[i - 1], timestamps[i - 1], timestamps[i]));
    }

    CapacityCurve { values }
}

/// Capacity curve over an aligned series' current column.
pub fn capacity_for_series(series: &AlignedSeries) -> CapacityCurve {
    cumulative_capacity(&series.timestamps(), &series.currents())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
