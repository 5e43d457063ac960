//! Battery telemetry analysis - command line entry point
//!
//! Picks a date directory, loads the shunt logger's current and voltage
//! files for that date, aligns them, integrates discharge capacity and
//! prints a report.
//!
//! Usage:
//!   batmon                      # latest date under data.base_dir
//!   batmon 2024-05-01           # a specific date (falls back to latest)
//!   batmon --list               # list available dates
//!   batmon 2024-05-01 --json    # summary as JSON
//!   batmon --plot               # also render a PNG (feature `plot`)
//!
//! Environment:
//!   BATMON_CONFIG   - alternative config file (default: batmon.toml)
//!   BATMON_DATA_DIR - overrides data.base_dir
//!   RUST_LOG        - log filter; overrides -v

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser};
use log::LevelFilter;

use batmon::config::{load_config, BatmonConfig};
use batmon::discovery::{find_date_directories, resolve_day_files, select_date};
use batmon::pipeline::{analyze_day, DayAnalysis};

#[derive(Parser)]
#[command(name = "batmon")]
#[command(about = "Battery current/voltage log analysis", version)]
struct Cli {
    /// Date to analyse (YYYY-MM-DD); defaults to the latest available
    date: Option<String>,

    /// Path to TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory containing YYYY-MM-DD data folders (overrides config)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// List available dates and exit
    #[arg(long)]
    list: bool,

    /// Print the summary as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Render a PNG chart; optional output path
    #[arg(long, num_args = 0..=1)]
    plot: Option<Option<PathBuf>>,

    /// Increase verbosity
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .format_timestamp_secs()
        .init();
}

fn print_rows(title: &str, day: &DayAnalysis, range: std::ops::Range<usize>) {
    println!("{}", title);
    for row in &day.series.rows[range] {
        println!(
            "  {}: {:>8.2} A  {:>7.2} V",
            row.timestamp.format("%H:%M:%S"),
            row.current,
            row.voltage
        );
    }
}

fn print_report(day: &DayAnalysis) {
    let n = day.series.len();
    println!("✓ Loaded {} data points ({} alignment)", n, day.series.mode);
    if day.series.mode.is_degraded() {
        println!("⚠ No exact timestamp matches: channels paired by position, check start offsets");
    }

    print_rows("First 5 timestamps:", day, 0..n.min(5));
    print_rows("Last 5 timestamps:", day, n.saturating_sub(5)..n);

    let s = &day.summary;
    if let (Some(first), Some(last)) = (s.first_timestamp, s.last_timestamp) {
        println!("\nTime Range: {} to {}", first.format("%H:%M:%S"), last.format("%H:%M:%S"));
    }
    println!("\nSummary:");
    println!("Max Current: {:.2} A", s.max_current_a);
    println!("Min Current: {:.2} A", s.min_current_a);
    println!("Max Voltage: {:.2} V", s.max_voltage_v);
    println!("Min Voltage: {:.2} V", s.min_voltage_v);
    println!("Final Cumulative Capacity: {:.2} Ah", s.final_capacity_ah);
}

#[cfg(feature = "plot")]
fn render_plot(day: &DayAnalysis, explicit: Option<PathBuf>, config: &BatmonConfig) {
    use batmon::plot::{default_plot_path, render_day_png};

    let path = explicit.unwrap_or_else(|| default_plot_path(&config.plot.output_dir, day.series.date));
    match render_day_png(day, &path, &config.plot) {
        Ok(()) => println!("✓ Plot saved to: {}", path.display()),
        Err(e) => eprintln!("✗ Plot not saved: {}", e),
    }
}

#[cfg(not(feature = "plot"))]
fn render_plot(_day: &DayAnalysis, _explicit: Option<PathBuf>, _config: &BatmonConfig) {
    eprintln!("✗ Plotting not available: rebuild with `--features plot`");
}

fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            process::exit(1);
        }
    };
    if let Some(dir) = cli.data_dir {
        config.data.base_dir = dir;
    }

    let base_dir = &config.data.base_dir;
    if !base_dir.is_dir() {
        eprintln!("Error: Directory '{}' does not exist.", base_dir.display());
        process::exit(1);
    }

    let date_dirs = find_date_directories(base_dir);
    if date_dirs.is_empty() {
        eprintln!("No valid date directories found in '{}'.", base_dir.display());
        eprintln!(
            "Please create date folders (YYYY-MM-DD) containing {}.txt and {}.txt files.",
            config.data.current_prefix, config.data.voltage_prefix
        );
        process::exit(1);
    }

    if !cli.json {
        println!("Available dates:");
        for d in &date_dirs {
            println!("  - {}", d.date);
        }
    }
    if cli.list {
        return;
    }

    let Some(selected) = select_date(&date_dirs, cli.date.as_deref()) else {
        process::exit(1);
    };
    if !cli.json {
        println!("Using data for date: {}\n", selected.date);
    }

    let day = match resolve_day_files(selected, &config.data).and_then(|files| analyze_day(&files)) {
        Ok(day) => day,
        Err(e) => {
            eprintln!("❌ Error processing data: {}", e);
            process::exit(1);
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&day.summary) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("❌ Failed to serialize summary: {}", e);
                process::exit(1);
            }
        }
    } else {
        print_report(&day);
    }

    if let Some(explicit) = cli.plot {
        render_plot(&day, explicit, &config);
    }
}
