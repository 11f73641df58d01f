use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Invalid window size {0}: a rolling window needs at least one observation")]
    InvalidWindow(usize),
}
