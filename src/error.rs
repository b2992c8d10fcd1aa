use std::path::PathBuf;

use thiserror::Error;

/// Domain errors raised while resolving, loading or prompting for trip data.
#[derive(Error, Debug)]
pub enum BikeshareError {
    #[error("Unknown city: '{0}'")]
    UnknownCity(String),

    #[error("No data source configured for city '{0}'")]
    NoDataSource(String),

    #[error("Unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("Data file not found: {}", .path.display())]
    MissingFile { path: PathBuf },

    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    #[error("Row {row}: invalid timestamp '{value}'")]
    InvalidTimestamp { row: usize, value: String },

    #[error("'{value}' is not a valid {kind}")]
    InvalidChoice { kind: &'static str, value: String },

    #[error("Input closed while waiting for {0}")]
    InputClosed(&'static str),
}
