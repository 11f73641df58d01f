use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One validated trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// A row as it comes out of a loader, before any validation.
///
/// Every field is optional so that gaps in the source can be counted and
/// reported before the table rejects them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    /// 1-based line in the source file, when the row came from one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
    pub date: Option<NaiveDate>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<u64>,
}

impl From<PriceBar> for RawBar {
    fn from(bar: PriceBar) -> Self {
        Self {
            line: None,
            date: Some(bar.date),
            open: Some(bar.open),
            high: Some(bar.high),
            low: Some(bar.low),
            close: Some(bar.close),
            volume: Some(bar.volume),
        }
    }
}
