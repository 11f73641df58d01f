use serde::{Deserialize, Serialize};

use crate::enums::UndefinedReason;

/// A single value in a derived column.
///
/// Absence is explicit: nothing in this workspace uses NaN to mean "no value".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum Cell {
    Defined(f64),
    Undefined(UndefinedReason),
}

impl Cell {
    /// Wraps a computed number, turning non-finite results into an undefined ratio.
    pub fn from_finite(value: f64) -> Self {
        if value.is_finite() {
            Cell::Defined(value)
        } else {
            Cell::Undefined(UndefinedReason::UndefinedRatio)
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Cell::Defined(v) => Some(*v),
            Cell::Undefined(_) => None,
        }
    }

    pub fn reason(&self) -> Option<UndefinedReason> {
        match self {
            Cell::Defined(_) => None,
            Cell::Undefined(reason) => Some(*reason),
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Cell::Defined(_))
    }

    pub fn is_undefined(&self) -> bool {
        !self.is_defined()
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::from_finite(value)
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) => Cell::from_finite(v),
            None => Cell::Undefined(UndefinedReason::MissingInput),
        }
    }
}
