// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum GovCnError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // e.g., 404 Not Found, 403 Forbidden

    #[error("Failed to parse search response: {0}")]
    Parse(String),

    #[error("Cache error: {0}")]
    Cache(#[from] StorageError),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Unexpected announcement title: {0}")]
    UnexpectedTitle(String),

    #[error("Holiday clause has an empty name")]
    EmptyName,

    #[error("Invalid date {year}-{month}-{day}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("Holiday '{name}' ends ({end}) before it starts ({start})")]
    InvertedRange {
        name: String,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("Content not found: {0}")]
    ContentNotFound(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("gov.cn interaction failed: {0}")]
    GovCn(#[from] GovCnError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
