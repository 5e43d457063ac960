/// PNG chart of one analysed date: current, voltage and capacity panels
/// stacked over a shared elapsed-time axis labelled in `HH:MM:SS`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;

use crate::config::PlotConfig;
use crate::pipeline::DayAnalysis;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("no aligned rows to plot for {0}")]
    Empty(NaiveDate),

    #[error("failed to create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render plot: {0}")]
    Render(String),
}

impl<E: std::error::Error + Send + Sync + 'static> From<DrawingAreaErrorKind<E>> for PlotError {
    fn from(value: DrawingAreaErrorKind<E>) -> Self {
        PlotError::Render(format!("{value:?}"))
    }
}

/// `<output_dir>/battery_data_<date>.png`
pub fn default_plot_path(output_dir: &Path, date: NaiveDate) -> PathBuf {
    output_dir.join(format!("battery_data_{}.png", date.format("%Y-%m-%d")))
}

struct Panel<'a> {
    title: &'a str,
    values: Vec<f64>,
    color: RGBColor,
    has_data: bool,
    /// Capacity axis starts at zero; the others fit their data.
    from_zero: bool,
    zero_line: bool,
}

fn y_range(panel: &Panel<'_>) -> (f64, f64) {
    let lo = panel.values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = panel.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if panel.from_zero {
        let top = if hi > 0.0 { hi * 1.1 } else { 1.0 };
        return (0.0, top);
    }
    if !lo.is_finite() || !hi.is_finite() || (hi - lo).abs() < f64::EPSILON {
        let mid = if lo.is_finite() { lo } else { 0.0 };
        return (mid - 1.0, mid + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

fn draw_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel<'_>,
    elapsed: &[f64],
    x_max: f64,
    label_x: &dyn Fn(&f64) -> String,
) -> Result<(), PlotError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let caption = if panel.has_data {
        panel.title.to_string()
    } else {
        format!("{} (no data)", panel.title)
    };
    let (y_lo, y_hi) = y_range(panel);

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .caption(caption, ("sans-serif", 16).into_font())
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 35)
        .build_cartesian_2d(0f64..x_max, y_lo..y_hi)?;

    chart
        .configure_mesh()
        .x_labels(8)
        .x_label_formatter(label_x)
        .y_desc(panel.title)
        .light_line_style(&BLACK.mix(0.08))
        .draw()?;

    if !panel.has_data {
        return Ok(());
    }

    if panel.zero_line {
        chart.draw_series(LineSeries::new(vec![(0.0, 0.0), (x_max, 0.0)], &RED.mix(0.4)))?;
    }

    let points = elapsed.iter().copied().zip(panel.values.iter().copied());
    chart.draw_series(LineSeries::new(points, &panel.color))?;

    Ok(())
}

/// Renders `day` to a PNG at `path`, creating parent directories.
///
/// # Errors
/// - `PlotError::Empty` — the series has no rows.
/// - `PlotError::CreateDir` — the output directory could not be created.
/// - `PlotError::Render` — the backend failed to draw or encode.
pub fn render_day_png(day: &DayAnalysis, path: &Path, style: &PlotConfig) -> Result<(), PlotError> {
    let date = day.series.date;
    let first: NaiveDateTime = day
        .series
        .rows
        .first()
        .map(|r| r.timestamp)
        .ok_or(PlotError::Empty(date))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| PlotError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let elapsed: Vec<f64> = day
        .series
        .rows
        .iter()
        .map(|r| (r.timestamp - first).num_seconds() as f64)
        .collect();
    let x_max = elapsed.last().copied().unwrap_or(0.0).max(1.0);
    let label_x = move |x: &f64| (first + Duration::seconds(*x as i64)).format("%H:%M:%S").to_string();

    let panels = [
        Panel {
            title: "Current [A]",
            values: day.series.currents(),
            color: BLACK,
            has_data: day.summary.has_current_data,
            from_zero: false,
            zero_line: true,
        },
        Panel {
            title: "Voltage [V]",
            values: day.series.voltages(),
            color: GREEN,
            has_data: day.summary.has_voltage_data,
            from_zero: false,
            zero_line: false,
        },
        Panel {
            title: "Capacity [Ah]",
            values: day.capacity.values.clone(),
            color: RED,
            has_data: day.summary.has_current_data,
            from_zero: true,
            zero_line: false,
        },
    ];

    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(
        &format!("Battery Data Analysis - {} ({})", date.format("%Y-%m-%d"), day.series.mode),
        ("sans-serif", 24).into_font(),
    )?;

    for (area, panel) in root.split_evenly((3, 1)).iter().zip(panels.iter()) {
        draw_panel(area, panel, &elapsed, x_max, &label_x)?;
    }

    root.present()?;
    Ok(())
}
