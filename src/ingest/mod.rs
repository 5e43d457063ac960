/// Ingestion of shunt logger text files.
///
/// Submodules:
/// - `decoder`     — line format: anchors, value lists, the marker fold.
/// - `reconstruct` — marker blocks → per-second samples.
/// - `loader`      — whole-file read + terminal "no data" check.

pub mod decoder;
pub mod loader;
pub mod reconstruct;

#[cfg(test)]
pub(crate) mod fixtures;

pub use loader::{channel_from_text, load_channel};
