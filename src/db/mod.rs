//! Database module for reading the review table
//!
//! SQLite (rusqlite) and PostgreSQL (sqlx) sources behind one `ReviewSource` trait.

pub mod connection;
pub mod review_repo;

pub use connection::{init_pool, redact, DbPool, SourceKind};
pub use review_repo::{
    open_source, PostgresReviewSource, ReviewSource, SqliteReviewSource, REVIEW_COLUMNS,
};
