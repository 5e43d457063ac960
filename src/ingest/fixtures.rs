/// Test fixtures: representative log files as written by the shunt logger.
///
/// The logger prints a newline and `HH:MM:SS --> ` at the start of every
/// minute, then one `value, ` per second. Files therefore end each line with
/// a trailing comma and may open with a partial, unanchored minute.

/// Current log: an unanchored partial minute, then two anchored minutes.
/// Values: 12:00:00-02 = 2.0, 12:01:00 = 1.0, 12:01:01 = -1.0.
#[cfg(test)]
pub(crate) fn fixture_current_log() -> &'static str {
    "0.7, 0.8, \n\
     12:00:00 --> 2.0, 2.0, 2.0, \n\
     \n\
     12:01:00 --> 1.0, -1.0, \n"
}

/// Voltage log sharing every current timestamp except 12:00:02, plus a
/// reading at 12:01:02 that has no current counterpart.
#[cfg(test)]
pub(crate) fn fixture_voltage_log() -> &'static str {
    "\n\
     12:00:00 --> 12.6, 12.5, \n\
     12:01:00 --> 12.4, 12.3, 12.2, \n"
}

/// Voltage log recorded an hour later than the current log: no key overlap.
#[cfg(test)]
pub(crate) fn fixture_offset_voltage_log() -> &'static str {
    "13:00:00 --> 12.9, 12.8, 12.7, 12.6, \n"
}

/// Bad tokens, a bad anchor, a bare continuation line and a minute-only anchor.
/// Five usable values, two rejected tokens, one rejected line.
#[cfg(test)]
pub(crate) fn fixture_malformed_log() -> &'static str {
    "10:00:00 --> 1.0, x, 2.0, \n\
     not-a-time --> 9.0, 9.0\n\
     3.0, ??, 4.0\n\
     10:01 --> 5.0\n"
}

/// A single anchored line carrying `count` readings (0.0, 1.0, 2.0, ...).
#[cfg(test)]
pub(crate) fn fixture_long_minute(anchor: &str, count: usize) -> String {
    let values: Vec<String> = (0..count).map(|i| format!("{}.0", i)).collect();
    format!("{} --> {}, \n", anchor, values.join(", "))
}
