/// Line decoder for the shunt logger's text format.
///
/// The logger appends one line per minute:
///
/// ```text
/// 14:03:00 --> 12.41, 12.38, 12.40, ... ,
/// ```
///
/// An anchor (`HH:MM:SS` or `HH:MM`) precedes the `-->` separator, followed
/// by one comma-separated reading per second. Lines without a separator are
/// bare value lists governed by the most recent anchor. Files often begin
/// with such a line because logging started mid-minute.
///
/// Nothing in this module fails: malformed anchors, malformed tokens and
/// values with no anchor are logged, counted in the `DecodeReport` and
/// skipped. Deciding whether an empty result is fatal is the caller's job.

use chrono::NaiveTime;
use log::{debug, warn};

/// Token dividing the time anchor from the value list.
pub const MARKER_SEPARATOR: &str = "-->";

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One decoded physical line.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// 1-based line number in the source text.
    pub line_number: usize,
    /// Explicit anchor carried by this line, if any.
    pub anchor: Option<NaiveTime>,
    pub values: Vec<f64>,
    /// Non-empty tokens that did not parse as numbers.
    pub rejected_tokens: usize,
}

/// What a single line turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedLine {
    /// Blank or whitespace-only.
    Empty,
    /// Separator present but the prefix is not a time of day.
    BadAnchor { line_number: usize, prefix: String },
    Record(RawRecord),
}

/// A value list paired with the marker that governs it.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerBlock {
    pub marker: NaiveTime,
    pub values: Vec<f64>,
}

/// Result of decoding a whole file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodeReport {
    pub blocks: Vec<MarkerBlock>,
    pub skipped_lines: usize,
    pub skipped_tokens: usize,
    /// Lines whose values arrived before any anchor was seen.
    pub unanchored_lines: usize,
}

impl DecodeReport {
    /// Number of (timestamp, value) pairs the blocks will expand into.
    pub fn value_count(&self) -> usize {
        self.blocks.iter().map(|b| b.values.len()).sum()
    }
}

// ---------------------------------------------------------------------------
// Single line
// ---------------------------------------------------------------------------

/// Parses an anchor prefix, trying `HH:MM:SS` before `HH:MM`.
pub fn parse_anchor(prefix: &str) -> Option<NaiveTime> {
    let prefix = prefix.trim();
    NaiveTime::parse_from_str(prefix, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(prefix, "%H:%M"))
        .ok()
}

/// Splits a comma-separated list into numbers.
///
/// Returns the parsed values and the count of rejected non-empty tokens.
/// Empty tokens are not rejections: the logger ends every list with `", "`.
pub fn parse_values(list: &str, line_number: usize) -> (Vec<f64>, usize) {
    let mut values = Vec::new();
    let mut rejected = 0;

    for token in list.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match token.parse::<f64>() {
            Ok(v) => values.push(v),
            Err(_) => {
                warn!("line {}: could not parse value: {}", line_number, token);
                rejected += 1;
            }
        }
    }

    (values, rejected)
}

/// Decodes one physical line. `line_number` is only used for diagnostics.
pub fn decode_line(line: &str, line_number: usize) -> DecodedLine {
    let line = line.trim();
    if line.is_empty() {
        return DecodedLine::Empty;
    }

    let (anchor, list) = match line.split_once(MARKER_SEPARATOR) {
        Some((prefix, rest)) => match parse_anchor(prefix) {
            Some(t) => (Some(t), rest),
            None => {
                return DecodedLine::BadAnchor {
                    line_number,
                    prefix: prefix.trim().to_string(),
                };
            }
        },
        None => (None, line),
    };

    let (values, rejected_tokens) = parse_values(list, line_number);
    DecodedLine::Record(RawRecord {
        line_number,
        anchor,
        values,
        rejected_tokens,
    })
}

// ---------------------------------------------------------------------------
// Whole file
// ---------------------------------------------------------------------------

/// Fold state: the marker in force plus everything collected so far.
#[derive(Default)]
struct DecodeState {
    marker: Option<NaiveTime>,
    report: DecodeReport,
}

impl DecodeState {
    fn absorb(mut self, decoded: DecodedLine) -> Self {
        match decoded {
            DecodedLine::Empty => {}
            DecodedLine::BadAnchor { line_number, prefix } => {
                warn!("line {}: could not parse timestamp: {}", line_number, prefix);
                self.report.skipped_lines += 1;
            }
            DecodedLine::Record(record) => {
                self.report.skipped_tokens += record.rejected_tokens;
                if let Some(anchor) = record.anchor {
                    self.marker = Some(anchor);
                }
                match self.marker {
                    Some(marker) if !record.values.is_empty() => {
                        self.report.blocks.push(MarkerBlock {
                            marker,
                            values: record.values,
                        });
                    }
                    Some(_) => {
                        debug!("line {}: marker with no values", record.line_number);
                    }
                    None => {
                        if !record.values.is_empty() {
                            warn!(
                                "line {}: {} values precede the first timestamp, skipping",
                                record.line_number,
                                record.values.len()
                            );
                            self.report.unanchored_lines += 1;
                        }
                    }
                }
            }
        }
        self
    }
}

/// Decodes a whole file's text into marker blocks.
///
/// The current marker is threaded through the fold, so an anchor-less line
/// inherits whatever anchor most recently preceded it.
pub fn decode_text(text: &str) -> DecodeReport {
    text.lines()
        .enumerate()
        .map(|(idx, line)| decode_line(line, idx + 1))
        .fold(DecodeState::default(), DecodeState::absorb)
        .report
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
