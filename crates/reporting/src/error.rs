use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write delimited report: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to serialize chart description: {0}")]
    Json(#[from] serde_json::Error),
}
