//! Sentiment scoring
//!
//! The lexicon is loaded explicitly from disk; the analyzer wraps it and is
//! passed by reference into the per-row scoring step.

pub mod analyzer;
pub mod lexicon;

pub use analyzer::{PolarityScores, SentimentAnalyzer};
pub use lexicon::Lexicon;
