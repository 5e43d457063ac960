/// Analysis over reconstructed channels.
///
/// Submodules:
/// - `alignment` — joins current and voltage on `HH:MM:SS` keys.
/// - `capacity`  — cumulative discharge integral (Ah).
/// - `summary`   — min/max per channel and final capacity.

pub mod alignment;
pub mod capacity;
pub mod summary;

pub use alignment::align_channels;
pub use capacity::{capacity_for_series, cumulative_capacity};
pub use summary::{summarize, DaySummary};
