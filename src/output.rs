//! Output sink - enriched reviews to CSV, plus a dataframe preview

use crate::error::{PipelineError, Result};
use crate::review::{EnrichedReview, SentimentBucket, SentimentCategory};
use chrono::NaiveDate;
use csv::WriterBuilder;
use polars::prelude::{DataFrame, NamedFrom, Series};
use serde::Serialize;
use std::path::Path;
use tracing::info;

pub const OUTPUT_COLUMNS: [&str; 9] = [
    "ReviewID",
    "CustomerID",
    "ProductID",
    "ReviewDate",
    "Rating",
    "ReviewText",
    "SentimentScore",
    "SentimentCategory",
    "SentimentBucket",
];

#[derive(Serialize)]
struct OutputRow<'a> {
    review_id: i64,
    customer_id: i64,
    product_id: i64,
    review_date: NaiveDate,
    rating: i64,
    review_text: Option<&'a str>,
    sentiment_score: f64,
    sentiment_category: SentimentCategory,
    sentiment_bucket: SentimentBucket,
}

impl<'a> From<&'a EnrichedReview> for OutputRow<'a> {
    fn from(row: &'a EnrichedReview) -> Self {
        Self {
            review_id: row.review.review_id,
            customer_id: row.review.customer_id,
            product_id: row.review.product_id,
            review_date: row.review.review_date,
            rating: row.review.rating,
            review_text: row.review.review_text.as_deref(),
            sentiment_score: row.sentiment_score,
            sentiment_category: row.sentiment_category,
            sentiment_bucket: row.sentiment_bucket,
        }
    }
}

/// Write every row, in order, under a fixed header. The header is written
/// even when there are no rows.
pub fn write_csv(path: &Path, rows: &[EnrichedReview]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(OUTPUT_COLUMNS)?;
    for row in rows {
        writer.serialize(OutputRow::from(row))?;
    }
    writer.flush()?;

    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Build a dataframe over the enriched rows.
pub fn to_frame(rows: &[EnrichedReview]) -> Result<DataFrame> {
    let columns = vec![
        Series::new(
            OUTPUT_COLUMNS[0],
            rows.iter().map(|r| r.review.review_id).collect::<Vec<_>>(),
        ),
        Series::new(
            OUTPUT_COLUMNS[1],
            rows.iter().map(|r| r.review.customer_id).collect::<Vec<_>>(),
        ),
        Series::new(
            OUTPUT_COLUMNS[2],
            rows.iter().map(|r| r.review.product_id).collect::<Vec<_>>(),
        ),
        Series::new(
            OUTPUT_COLUMNS[3],
            rows.iter()
                .map(|r| r.review.review_date.to_string())
                .collect::<Vec<_>>(),
        ),
        Series::new(
            OUTPUT_COLUMNS[4],
            rows.iter().map(|r| r.review.rating).collect::<Vec<_>>(),
        ),
        Series::new(
            OUTPUT_COLUMNS[5],
            rows.iter()
                .map(|r| r.review.review_text.clone())
                .collect::<Vec<Option<String>>>(),
        ),
        Series::new(
            OUTPUT_COLUMNS[6],
            rows.iter().map(|r| r.sentiment_score).collect::<Vec<_>>(),
        ),
        Series::new(
            OUTPUT_COLUMNS[7],
            rows.iter()
                .map(|r| r.sentiment_category.as_str())
                .collect::<Vec<_>>(),
        ),
        Series::new(
            OUTPUT_COLUMNS[8],
            rows.iter()
                .map(|r| r.sentiment_bucket.as_str())
                .collect::<Vec<_>>(),
        ),
    ];

    DataFrame::new(columns).map_err(|e| PipelineError::Polars(e.to_string()))
}

/// Render the first `n` rows as a table.
pub fn preview(rows: &[EnrichedReview], n: usize) -> Result<String> {
    let frame = to_frame(rows)?;
    Ok(format!("{}", frame.head(Some(n))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::Review;

    fn enriched(id: i64, text: Option<&str>, score: f64) -> EnrichedReview {
        EnrichedReview {
            review: Review {
                review_id: id,
                customer_id: 100 + id,
                product_id: 7,
                review_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                rating: 4,
                review_text: text.map(str::to_string),
            },
            sentiment_score: score,
            sentiment_category: SentimentCategory::Positive,
            sentiment_bucket: SentimentBucket::StronglyPositive,
        }
    }

    #[test]
    fn test_write_csv_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.csv");
        let rows = vec![
            enriched(3, Some("Loved it, would buy again"), 0.8316),
            enriched(1, None, 0.0),
        ];

        write_csv(&path, &rows).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, OUTPUT_COLUMNS);

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][0], "3");
        assert_eq!(&records[0][3], "2024-05-01");
        assert_eq!(&records[0][5], "Loved it, would buy again");
        assert_eq!(&records[0][6], "0.8316");
        assert_eq!(&records[0][7], "Positive");
        assert_eq!(&records[0][8], "0.5 to 1.0");
        assert_eq!(&records[1][0], "1");
        assert_eq!(&records[1][5], "");
    }

    #[test]
    fn test_write_csv_empty_dataset_keeps_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        write_csv(&path, &[]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.trim_end(), OUTPUT_COLUMNS.join(","));
    }

    #[test]
    fn test_frame_and_preview() {
        let rows: Vec<EnrichedReview> = (1..=8).map(|i| enriched(i, Some("ok"), 0.6)).collect();

        let frame = to_frame(&rows).unwrap();
        assert_eq!(frame.height(), 8);
        assert_eq!(frame.width(), OUTPUT_COLUMNS.len());

        let rendered = preview(&rows, 5).unwrap();
        assert!(rendered.contains("shape: (5, 9)"));
    }
}
