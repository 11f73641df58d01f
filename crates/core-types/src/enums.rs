use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a derived value is absent.
///
/// Kept separate from the value itself so consumers can tell a warm-up gap
/// from a price anomaly without inspecting the surrounding rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UndefinedReason {
    /// Not enough prior rows to fill the window (or no prior day at all).
    InsufficientHistory,
    /// A ratio had a zero or negative price on either side.
    UndefinedRatio,
    /// An input that the value depends on was itself undefined.
    MissingInput,
}

impl fmt::Display for UndefinedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UndefinedReason::InsufficientHistory => "insufficient history",
            UndefinedReason::UndefinedRatio => "undefined ratio",
            UndefinedReason::MissingInput => "missing input",
        };
        f.write_str(s)
    }
}

/// The base columns every price record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Date,
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Date,
        Field::Open,
        Field::High,
        Field::Low,
        Field::Close,
        Field::Volume,
    ];

    /// The column label used in exported reports.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Date => "Date",
            Field::Open => "Open",
            Field::High => "High",
            Field::Low => "Low",
            Field::Close => "Close",
            Field::Volume => "Volume",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
