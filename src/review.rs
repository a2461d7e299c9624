//! Review records as read from the source table and as enriched by the pipeline

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the source review table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "ReviewID")]
    pub review_id: i64,

    #[serde(rename = "CustomerID")]
    pub customer_id: i64,

    #[serde(rename = "ProductID")]
    pub product_id: i64,

    #[serde(rename = "ReviewDate")]
    pub review_date: NaiveDate,

    #[serde(rename = "Rating")]
    pub rating: i64,

    /// NULL in the source table maps to `None`
    #[serde(rename = "ReviewText")]
    pub review_text: Option<String>,
}

impl Review {
    pub fn text(&self) -> &str {
        self.review_text.as_deref().unwrap_or("")
    }
}

/// Business-facing sentiment label derived from score and rating together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SentimentCategory {
    #[serde(rename = "Positive")]
    Positive,
    #[serde(rename = "Negative")]
    Negative,
    #[serde(rename = "Neutral")]
    Neutral,
    #[serde(rename = "Mixed Positive")]
    MixedPositive,
    #[serde(rename = "Mixed Negative")]
    MixedNegative,
}

impl SentimentCategory {
    pub const ALL: [SentimentCategory; 5] = [
        SentimentCategory::Positive,
        SentimentCategory::Negative,
        SentimentCategory::Neutral,
        SentimentCategory::MixedPositive,
        SentimentCategory::MixedNegative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentCategory::Positive => "Positive",
            SentimentCategory::Negative => "Negative",
            SentimentCategory::Neutral => "Neutral",
            SentimentCategory::MixedPositive => "Mixed Positive",
            SentimentCategory::MixedNegative => "Mixed Negative",
        }
    }
}

impl fmt::Display for SentimentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse range label for the compound score, independent of rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SentimentBucket {
    #[serde(rename = "0.5 to 1.0")]
    StronglyPositive,
    #[serde(rename = "0.0 to 0.49")]
    MildlyPositive,
    #[serde(rename = "-0.49 to 0.0")]
    MildlyNegative,
    #[serde(rename = "-1.0 to -0.5")]
    StronglyNegative,
}

impl SentimentBucket {
    pub const ALL: [SentimentBucket; 4] = [
        SentimentBucket::StronglyPositive,
        SentimentBucket::MildlyPositive,
        SentimentBucket::MildlyNegative,
        SentimentBucket::StronglyNegative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentBucket::StronglyPositive => "0.5 to 1.0",
            SentimentBucket::MildlyPositive => "0.0 to 0.49",
            SentimentBucket::MildlyNegative => "-0.49 to 0.0",
            SentimentBucket::StronglyNegative => "-1.0 to -0.5",
        }
    }
}

impl fmt::Display for SentimentBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A review plus the three derived sentiment fields.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedReview {
    pub review: Review,
    pub sentiment_score: f64,
    pub sentiment_category: SentimentCategory,
    pub sentiment_bucket: SentimentBucket,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_match_serde_names() {
        for category in SentimentCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
        for bucket in SentimentBucket::ALL {
            let json = serde_json::to_string(&bucket).unwrap();
            assert_eq!(json, format!("\"{}\"", bucket));
        }
    }

    #[test]
    fn test_missing_text_reads_as_empty() {
        let review = Review {
            review_id: 1,
            customer_id: 2,
            product_id: 3,
            review_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            rating: 4,
            review_text: None,
        };
        assert_eq!(review.text(), "");
    }
}
