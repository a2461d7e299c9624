//! Sentiment classification rule table
//!
//! Maps a compound sentiment score and a star rating to a business-facing
//! category, and the score alone to a coarse bucket label.

use crate::review::{SentimentBucket, SentimentCategory};
use std::ops::RangeInclusive;
use thiserror::Error;

/// Scores above this count as positive text.
pub const POSITIVE_THRESHOLD: f64 = 0.05;

/// Scores below this count as negative text.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

pub const RATING_RANGE: RangeInclusive<i64> = 1..=5;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("sentiment score {0} is not a finite number")]
    NonFiniteScore(f64),

    #[error("rating {0} is outside the accepted range 1-5")]
    RatingOutOfRange(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: SentimentCategory,
    pub bucket: SentimentBucket,
}

/// Categorize a score together with its rating.
///
/// Total over every score and rating; ratings outside 1-5 fall through the
/// same `>= 4` / `== 3` / else split.
pub fn categorize(score: f64, rating: i64) -> SentimentCategory {
    use SentimentCategory::*;

    if score > POSITIVE_THRESHOLD {
        match rating {
            r if r >= 4 => Positive,
            3 => MixedPositive,
            _ => MixedNegative,
        }
    } else if score < NEGATIVE_THRESHOLD {
        match rating {
            r if r <= 2 => Negative,
            3 => MixedNegative,
            _ => MixedPositive,
        }
    } else {
        match rating {
            3 => Neutral,
            r if r >= 4 => Positive,
            _ => Negative,
        }
    }
}

/// Bucket a score into one of four range labels.
pub fn bucket(score: f64) -> SentimentBucket {
    if score >= 0.5 {
        SentimentBucket::StronglyPositive
    } else if score >= 0.0 {
        SentimentBucket::MildlyPositive
    } else if score > -0.5 {
        SentimentBucket::MildlyNegative
    } else {
        SentimentBucket::StronglyNegative
    }
}

/// Validate the inputs, then categorize and bucket them.
pub fn classify(score: f64, rating: i64) -> Result<Classification, InputError> {
    if !score.is_finite() {
        return Err(InputError::NonFiniteScore(score));
    }
    if !RATING_RANGE.contains(&rating) {
        return Err(InputError::RatingOutOfRange(rating));
    }

    Ok(Classification {
        category: categorize(score, rating),
        bucket: bucket(score),
    })
}
