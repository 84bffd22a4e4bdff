use std::path::PathBuf;
use thiserror::Error;

/// A forecast sample that falls outside the documented ranges.
#[derive(Debug, Error, PartialEq)]
pub enum SampleError {
    #[error("Forecast field '{field}' is out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("Forecast field '{field}' is not a finite number")]
    NotFinite { field: &'static str },
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to open location catalog '{0}'")]
    Open(PathBuf, #[source] std::io::Error),

    #[error("Failed to read location catalog")]
    Csv(#[from] csv::Error),

    #[error("Location catalog contains no usable rows")]
    Empty,

    #[error("Unknown city '{0}'. Hint: run `citycast cities` to list available cities.")]
    UnknownCity(String),
}
