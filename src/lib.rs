//! # pricelens
//!
//! Daily price-series analytics for a single instrument: load a price file,
//! derive moving averages and returns, and write the augmented table.
//!
//! The binary in `main.rs` is a thin CLI over [`pipeline`].

pub mod pipeline;

pub use pipeline::{PipelineError, analyze, loader_for, run, save};
