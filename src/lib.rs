pub mod classifier;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod review;
pub mod sentiment;

// Database module for SQLite / PostgreSQL sources
pub mod db;

pub use classifier::{bucket, categorize, classify, Classification};
pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use review::{EnrichedReview, Review, SentimentBucket, SentimentCategory};
pub use sentiment::SentimentAnalyzer;
