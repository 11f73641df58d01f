//! Turns provider files into the flat rows a `PriceTable` is built from.
//!
//! Provider-specific framing (multi-row or ticker-qualified headers) is
//! resolved here so nothing downstream has to know about it.

use core_types::RawBar;

mod csv_loader;
pub mod error;
pub mod header;
pub mod summary;

pub use csv_loader::CsvLoader;
pub use error::LoaderError;
pub use summary::MissingValueSummary;

/// A source of raw daily rows for a single instrument, ordered by date.
pub trait SeriesLoader {
    fn load(&self) -> Result<Vec<RawBar>, LoaderError>;
}
