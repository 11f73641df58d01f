pub mod cell;
pub mod enums;
pub mod error;
pub mod structs;
pub mod table;

// Re-export the core types to provide a clean public API.
pub use cell::Cell;
pub use enums::{Field, UndefinedReason};
pub use error::{CoreError, MalformedReason};
pub use structs::{PriceBar, RawBar};
pub use table::PriceTable;
