/// batmon: battery shunt-logger telemetry analysis.
///
/// Turns the logger's per-minute text files into aligned per-second current
/// and voltage series and a cumulative discharge-capacity curve.
///
/// # Module structure
///
/// ```text
/// batmon
/// ├── model       — shared data types (Sample, Channel, AlignedSeries, IngestError, …)
/// ├── config      — batmon.toml loader (data layout, chart settings)
/// ├── discovery   — date directories + channel file fallback resolution
/// ├── ingest
/// │   ├── decoder     — line format, anchors, the marker fold
/// │   ├── reconstruct — marker blocks → per-second samples
/// │   ├── loader      — one-shot file read, "no data" failure
/// │   └── fixtures (test only) — representative logger files
/// ├── analysis
/// │   ├── alignment — HH:MM:SS inner join, positional fallback, zero fill
/// │   ├── capacity  — cumulative discharge Ah (left Riemann sum)
/// │   └── summary   — min/max per channel, final capacity
/// ├── pipeline    — load both channels in parallel, align, integrate, summarize
/// └── plot        — PNG rendering (feature `plot`)
/// ```

pub mod analysis;
pub mod config;
pub mod discovery;
pub mod ingest;
pub mod model;
pub mod pipeline;

#[cfg(feature = "plot")]
pub mod plot;
