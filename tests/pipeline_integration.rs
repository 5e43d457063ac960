/// Integration tests for the full date pipeline
///
/// These tests verify:
/// 1. Discovery finds date directories and resolves channel files
/// 2. The pipeline decodes, aligns and integrates real logger output
/// 3. Missing and degraded channels behave as documented
/// 4. Terminal failures produce no series
///
/// Each test builds its own data directory under the system temp dir.
///
/// Run with: cargo test --test pipeline_integration

use batmon::config::DataConfig;
use batmon::discovery::{find_date_directories, resolve_day_files, select_date};
use batmon::model::{AlignmentMode, IngestError};
use batmon::pipeline::{analyze_day, DayAnalysis};

use chrono::{NaiveDate, NaiveTime};
use std::fs;
use std::path::{Path, PathBuf};

// A logger file as written on the SD card: the logger started 20 s into
// 09:59, so the file opens with a partial unanchored line, then two
// complete minutes, with one corrupted reading in the second.
const AMPS_LOG: &str = "\
4.1, 4.1, 4.0,
09:59:00 --> 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0,

10:00:00 --> -1.5, -1.5, #ERR, -1.5,
";

const VOLTS_LOG: &str = "\

09:59:00 --> 12.80, 12.79, 12.78,
10:00:00 --> 12.90, 12.91, 12.92, 12.93,
";

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("batmon-it-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn write(path: &Path, contents: &str) {
    fs::write(path, contents).expect("write fixture file");
}

fn run_latest(base: &Path) -> Result<DayAnalysis, IngestError> {
    let dirs = find_date_directories(base);
    let selected = select_date(&dirs, None).expect("at least one date directory");
    let files = resolve_day_files(selected, &DataConfig::default())?;
    analyze_day(&files)
}

#[test]
fn test_full_day_exact_alignment() {
    let base = scratch("exact");
    let day_dir = base.join("2024-05-01");
    fs::create_dir(&day_dir).unwrap();
    write(&day_dir.join("Amps 2024-05-01.txt"), AMPS_LOG);
    write(&day_dir.join("Volts 2024-05-01.txt"), VOLTS_LOG);

    let day = run_latest(&base).expect("valid day should analyse");

    assert_eq!(day.series.mode, AlignmentMode::Exact);
    // Shared keys: 09:59:00-02 and 10:00:00-02 (the #ERR reading shifts
    // -1.5 into 10:00:02; 10:00:03 exists only in voltage).
    assert_eq!(day.series.len(), 6);
    assert_eq!(day.series.rows[0].timestamp.date(), date("2024-05-01"));
    assert_eq!(day.series.rows[3].timestamp.time(), NaiveTime::from_hms_opt(10, 0, 0).unwrap());
    assert_eq!(day.capacity.len(), day.series.len());
    assert_eq!(day.capacity.values[0], 0.0);
    assert!(day.capacity.values.windows(2).all(|w| w[1] >= w[0]));

    // 2 A over 09:59:00 → 09:59:01 → 09:59:02 → 10:00:00 (1 + 1 + 58 s);
    // the -1.5 A intervals after 10:00:00 add nothing.
    let expected = 2.0 * 60.0 / 3600.0;
    assert!(
        (day.summary.final_capacity_ah - expected).abs() < 1e-12,
        "expected {} Ah, got {}",
        expected,
        day.summary.final_capacity_ah
    );
    assert_eq!(day.summary.min_current_a, -1.5);
    assert_eq!(day.summary.max_voltage_v, 12.92);

    fs::remove_dir_all(&base).ok();
}

#[test]
fn test_latest_date_selected_and_fallback_names_used() {
    let base = scratch("latest");
    let old = base.join("2024-04-30");
    let new = base.join("2024-05-02");
    fs::create_dir(&old).unwrap();
    fs::create_dir(&new).unwrap();
    write(&old.join("Amps.txt"), "08:00 --> 9.0, 9.0\n");
    write(&new.join("Amps.txt"), AMPS_LOG);
    write(&new.join("Volts.txt"), VOLTS_LOG);

    let day = run_latest(&base).expect("fallback names should resolve");
    assert_eq!(day.series.date, date("2024-05-02"));
    assert_eq!(day.series.mode, AlignmentMode::Exact);

    fs::remove_dir_all(&base).ok();
}

#[test]
fn test_current_only_day_zero_fills_voltage() {
    let base = scratch("current-only");
    let day_dir = base.join("2024-05-01");
    fs::create_dir(&day_dir).unwrap();
    write(
        &day_dir.join("Amps 2024-05-01.txt"),
        "14:00:00 --> 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, \n",
    );

    let day = run_latest(&base).expect("current alone is enough");

    assert_eq!(day.series.mode, AlignmentMode::CurrentOnly);
    assert_eq!(day.series.len(), 10);
    assert!(day.series.voltages().iter().all(|&v| v == 0.0));
    assert!(!day.summary.has_voltage_data);
    assert!((day.summary.final_capacity_ah - 9.0 / 3600.0).abs() < 1e-12);

    fs::remove_dir_all(&base).ok();
}

#[test]
fn test_offset_channels_degrade_to_positional() {
    let base = scratch("positional");
    let day_dir = base.join("2024-05-01");
    fs::create_dir(&day_dir).unwrap();
    write(&day_dir.join("Amps 2024-05-01.txt"), "10:00:00 --> 1.0, 2.0, 3.0\n");
    write(&day_dir.join("Volts 2024-05-01.txt"), "11:00:00 --> 12.0, 12.1\n");

    let day = run_latest(&base).expect("degraded alignment still analyses");

    assert_eq!(day.series.mode, AlignmentMode::Positional);
    assert_eq!(day.series.len(), 2, "truncated to the shorter channel");
    assert_eq!(day.series.rows[1].current, 2.0);
    assert_eq!(day.series.rows[1].voltage, 12.1);
    assert_eq!(day.summary.alignment, AlignmentMode::Positional);

    fs::remove_dir_all(&base).ok();
}

#[test]
fn test_parent_directory_fallback() {
    let base = scratch("parent");
    let day_dir = base.join("2024-05-01");
    fs::create_dir(&day_dir).unwrap();
    write(&base.join("Volts 2024-05-01.txt"), VOLTS_LOG);

    let day = run_latest(&base).expect("parent directory voltage should resolve");
    assert_eq!(day.series.mode, AlignmentMode::VoltageOnly);
    assert!(day.series.currents().iter().all(|&c| c == 0.0));
    assert_eq!(day.summary.final_capacity_ah, 0.0);

    fs::remove_dir_all(&base).ok();
}

#[test]
fn test_neither_file_present_is_terminal() {
    let base = scratch("none");
    fs::create_dir(base.join("2024-05-01")).unwrap();

    match run_latest(&base) {
        Err(IngestError::NoChannels { date: d, .. }) => assert_eq!(d, date("2024-05-01")),
        other => panic!("expected NoChannels, got {:?}", other.map(|d| d.summary)),
    }

    fs::remove_dir_all(&base).ok();
}

#[test]
fn test_unparseable_file_is_terminal() {
    let base = scratch("garbage");
    let day_dir = base.join("2024-05-01");
    fs::create_dir(&day_dir).unwrap();
    write(&day_dir.join("Amps 2024-05-01.txt"), AMPS_LOG);
    write(&day_dir.join("Volts 2024-05-01.txt"), "garbage --> a, b\nc, d\n");

    let result = run_latest(&base);
    assert!(
        matches!(result, Err(IngestError::NoData(_))),
        "a file with no samples must fail the whole date, got {:?}",
        result.map(|d| d.summary)
    );

    fs::remove_dir_all(&base).ok();
}
