use std::path::PathBuf;
use thiserror::Error;

use crate::classifier::InputError;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Sentiment lexicon unavailable at {path}: {source}", path = .path.display())]
    LexiconUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Sentiment lexicon format error: {0}")]
    LexiconFormat(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    #[error("Invalid review date '{value}' for review {review_id}")]
    InvalidDate { review_id: i64, value: String },

    #[error("Invalid review {review_id}: {source}")]
    InvalidRecord {
        review_id: i64,
        #[source]
        source: InputError,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Polars error: {0}")]
    Polars(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
