use core_types::Field;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to open the price file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read delimited data: {0}")]
    Csv(#[from] csv::Error),

    #[error("The price file has no header row")]
    EmptyFile,

    #[error("Required column '{0}' not found in the header")]
    MissingColumn(Field),

    #[error("Invalid value {value:?} for '{field}' on line {line}: {reason}")]
    Parse {
        line: u64,
        field: Field,
        value: String,
        reason: String,
    },
}
