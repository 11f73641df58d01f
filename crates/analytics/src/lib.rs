//! # Indicator Engine
//!
//! This crate derives the indicator columns of a daily price series: two simple
//! moving averages of the close, the daily return and the compounded
//! cumulative return.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** no I/O and no global state. It depends only on `core-types`
//!   for its data model and `configuration` for its parameters.
//! - **Explicit absence:** values that cannot be computed are `Cell::Undefined`
//!   with a reason, never NaN and never zero.
//!
//! ## Public API
//!
//! - `IndicatorEngine`: turns a `PriceTable` into an `AugmentedTable`.
//! - `AugmentedTable` / `IndicatorRow`: the per-day output.
//! - `FinalReturn`: the last cumulative return, formatted as a signed percentage.
//! - `indicators`: the column functions the engine is built from.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod indicators;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::IndicatorEngine;
pub use error::AnalyticsError;
pub use report::{AugmentedTable, FinalReturn, IndicatorRow};
