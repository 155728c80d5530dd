// errors.rs
use thiserror::Error;

use crate::mailer::MailerError;
use crate::scraper::ScraperError;

/// Problems with the fixed run configuration. Always fatal for the run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid date {value:?} for {field}: {source}")]
    InvalidDate {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid value {value:?} for {field}")]
    Invalid { field: &'static str, value: String },
}

/// Errors from the object store and the history table.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object {bucket}/{key} not found")]
    NotFound { bucket: String, key: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("state encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("batch of {0} rows exceeds the per-request limit")]
    BatchTooLarge(usize),

    #[error("connection slot unavailable")]
    Internal,
}

/// Everything a job can fail with.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("scrape failed: {0}")]
    Scraper(#[from] ScraperError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("notification failed: {0}")]
    Mailer(#[from] MailerError),
}
