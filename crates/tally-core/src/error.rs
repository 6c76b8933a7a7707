//! Error types for tally

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Document source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Failed to decode document: {0}")]
    Decode(String),

    #[error("Generation service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Generation service misconfigured: {0}")]
    ServiceConfig(String),

    #[error("Failed to parse extraction response: {0}")]
    ExtractionParse(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
