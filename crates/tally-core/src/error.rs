//! Error types for Tally

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The persistent store could not be reached or a snapshot query failed.
    /// Aggregation never returns partial data; any fetch failure collapses
    /// into this variant.
    #[error("Financial data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("AI provider error: {0}")]
    Provider(String),

    #[error("Mail transport error: {0}")]
    Mail(String),
}

pub type Result<T> = std::result::Result<T, Error>;
