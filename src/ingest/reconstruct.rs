/// Series reconstruction: marker blocks → per-second samples.
///
/// The logger writes one reading per second without per-reading timestamps,
/// so each reading's time is recovered from its position in the block: the
/// k-th value lands at second `k % 60` of the marker's minute, advanced by
/// `k / 60` whole minutes. Blocks longer than 60 values spill into the
/// following minutes.

use chrono::{Duration, NaiveTime, Timelike};
use log::warn;

use crate::ingest::decoder::MarkerBlock;
use crate::model::{Channel, ChannelKind, Sample};

/// Drops the seconds from an anchor; reconstruction counts from `:00`.
pub fn truncate_to_minute(marker: NaiveTime) -> NaiveTime {
    marker
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(marker)
}

/// Time of the `index`-th reading governed by `marker`. Wraps at midnight.
pub fn sample_time(marker: NaiveTime, index: usize) -> NaiveTime {
    let minute = truncate_to_minute(marker);
    let extra_minutes = (index / 60) as i64;
    let second = (index % 60) as i64;
    let (time, _days) =
        minute.overflowing_add_signed(Duration::minutes(extra_minutes) + Duration::seconds(second));
    time
}

/// Expands one block into samples, in value order.
pub fn expand_block(block: &MarkerBlock) -> impl Iterator<Item = Sample> + '_ {
    block
        .values
        .iter()
        .enumerate()
        .map(move |(idx, &value)| Sample {
            time: sample_time(block.marker, idx),
            value,
        })
}

/// Builds a channel from decoded blocks in encounter order.
///
/// No reordering or de-duplication happens here; a sample that does not
/// move strictly forward in time is reported once per occurrence.
pub fn reconstruct(kind: ChannelKind, blocks: &[MarkerBlock]) -> Channel {
    let mut samples: Vec<Sample> = Vec::with_capacity(blocks.iter().map(|b| b.values.len()).sum());

    for sample in blocks.iter().flat_map(expand_block) {
        if let Some(prev) = samples.last() {
            if sample.time <= prev.time {
                warn!(
                    "{} channel: sample at {} does not follow {}",
                    kind,
                    sample.time.format("%H:%M:%S"),
                    prev.time.format("%H:%M:%S")
                );
            }
        }
        samples.push(sample);
    }

    Channel::new(kind, samples)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::decoder::decode_text;
    use crate::ingest::fixtures::*;

    fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_sample_time_discards_anchor_seconds() {
        assert_eq!(sample_time(hms(14, 3, 27), 0), hms(14, 3, 0));
        assert_eq!(sample_time(hms(14, 3, 27), 5), hms(14, 3, 5));
    }

    #[test]
    fn test_sample_time_spills_into_next_minutes() {
        assert_eq!(sample_time(hms(12, 0, 0), 59), hms(12, 0, 59));
        assert_eq!(sample_time(hms(12, 0, 0), 60), hms(12, 1, 0));
        assert_eq!(sample_time(hms(12, 0, 0), 130), hms(12, 2, 10));
    }

    #[test]
    fn test_sample_time_carries_into_next_hour() {
        assert_eq!(sample_time(hms(9, 59, 0), 61), hms(10, 0, 1));
    }

    #[test]
    fn test_seventy_five_values_cover_two_minutes() {
        let report = decode_text(&fixture_long_minute("12:00:00", 75));
        let channel = reconstruct(ChannelKind::Current, &report.blocks);

        assert_eq!(channel.len(), 75);
        for (i, sample) in channel.samples.iter().take(60).enumerate() {
            assert_eq!(sample.time, hms(12, 0, i as u32), "sample {} in first minute", i);
        }
        for (i, sample) in channel.samples.iter().skip(60).enumerate() {
            assert_eq!(sample.time, hms(12, 1, i as u32), "sample {} in spill minute", i);
        }
        assert_eq!(channel.samples[74].time, hms(12, 1, 14));
        assert_eq!(channel.samples[74].value, 74.0);
    }

    #[test]
    fn test_reconstructed_fixture_is_strictly_increasing() {
        let report = decode_text(fixture_current_log());
        let channel = reconstruct(ChannelKind::Current, &report.blocks);

        assert_eq!(channel.len(), 5);
        assert!(
            channel.samples.windows(2).all(|w| w[0].time < w[1].time),
            "well-formed input must produce strictly increasing, unique timestamps"
        );
        assert_eq!(channel.samples[3].time, hms(12, 1, 0));
        assert_eq!(channel.samples[4].value, -1.0);
    }

    #[test]
    fn test_reconstruct_keeps_encounter_order_for_repeated_marker() {
        // A bare continuation line restarts at second 0 of the same minute.
        let report = decode_text("08:00:00 --> 1.0, 2.0\n3.0\n");
        let channel = reconstruct(ChannelKind::Voltage, &report.blocks);

        let times: Vec<NaiveTime> = channel.samples.iter().map(|s| s.time).collect();
        assert_eq!(times, vec![hms(8, 0, 0), hms(8, 0, 1), hms(8, 0, 0)]);
        assert_eq!(channel.kind, ChannelKind::Voltage);
    }

    #[test]
    fn test_reconstruct_no_blocks_gives_empty_channel() {
        let channel = reconstruct(ChannelKind::Current, &[]);
        assert!(channel.is_empty());
    }
}
