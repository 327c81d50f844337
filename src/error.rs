//! Error types for the evaluation store and sync connector.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Import text was not a valid evaluation document. Stored state is untouched.
    #[error("Import failed, not a valid evaluation document: {0}")]
    ImportParse(#[source] serde_json::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Remote save/load failed; the message is meant to be shown as-is.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
