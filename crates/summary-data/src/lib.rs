//! Data layer of the accessory inventory summary.
//!
//! Streams the monthly inventory extracts, loads the OR sales summary,
//! aggregates both into the summary document and runs the top-level job.

pub mod aggregator;
pub mod pipeline;
pub mod reader;
pub mod sales;
pub mod summary;

pub use summary_core as core;
