//! Review repository - reads the review table from SQLite or PostgreSQL

use super::connection::{init_pool, redact, DbPool, SourceKind};
use crate::config::validate_table_name;
use crate::error::{PipelineError, Result};
use crate::review::Review;
use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{Connection, OpenFlags};
use sqlx::Row;
use std::path::{Path, PathBuf};
use tracing::info;

/// Columns read from the source table, in select order.
pub const REVIEW_COLUMNS: [&str; 6] = [
    "ReviewID",
    "CustomerID",
    "ProductID",
    "ReviewDate",
    "Rating",
    "ReviewText",
];

/// Read side of the pipeline.
#[async_trait]
pub trait ReviewSource: Send + Sync {
    /// All reviews, in result-set order
    async fn fetch_reviews(&self) -> Result<Vec<Review>>;

    async fn count_reviews(&self) -> Result<u64>;

    /// Human readable description for logs (no credentials)
    fn describe(&self) -> String;
}

/// Ids and rating are cast to BIGINT and the date to TEXT so both backends
/// decode the same way.
pub fn review_query(table: &str) -> String {
    format!(
        "SELECT CAST({} AS BIGINT), CAST({} AS BIGINT), CAST({} AS BIGINT), CAST({} AS TEXT), CAST({} AS BIGINT), {} FROM {}",
        REVIEW_COLUMNS[0],
        REVIEW_COLUMNS[1],
        REVIEW_COLUMNS[2],
        REVIEW_COLUMNS[3],
        REVIEW_COLUMNS[4],
        REVIEW_COLUMNS[5],
        table
    )
}

fn count_query(table: &str) -> String {
    format!("SELECT COUNT(*) FROM {}", table)
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part (`T` or space).
pub fn parse_review_date(review_id: i64, value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    let invalid = || PipelineError::InvalidDate {
        review_id,
        value: value.to_string(),
    };

    let (date, rest) = match trimmed.get(..10) {
        Some(date) => (date, &trimmed[10..]),
        None => return Err(invalid()),
    };
    if !(rest.is_empty() || rest.starts_with(' ') || rest.starts_with('T')) {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| invalid())
}

/// Row as decoded, before the date is parsed.
struct RawReview {
    review_id: i64,
    customer_id: i64,
    product_id: i64,
    review_date: String,
    rating: i64,
    review_text: Option<String>,
}

impl RawReview {
    fn into_review(self) -> Result<Review> {
        Ok(Review {
            review_id: self.review_id,
            customer_id: self.customer_id,
            product_id: self.product_id,
            review_date: parse_review_date(self.review_id, &self.review_date)?,
            rating: self.rating,
            review_text: self.review_text,
        })
    }
}

pub struct SqliteReviewSource {
    path: PathBuf,
    table: String,
}

impl SqliteReviewSource {
    /// Open read-only; a missing database file is an error, never created.
    pub fn open(path: impl Into<PathBuf>, table: &str) -> Result<Self> {
        validate_table_name(table)?;
        let source = Self {
            path: path.into(),
            table: table.to_string(),
        };
        source.connect()?;
        Ok(source)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(conn)
    }

    fn read_reviews(&self) -> Result<Vec<Review>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&review_query(&self.table))?;

        let rows = stmt.query_map([], |row| {
            Ok(RawReview {
                review_id: row.get(0)?,
                customer_id: row.get(1)?,
                product_id: row.get(2)?,
                review_date: row.get(3)?,
                rating: row.get(4)?,
                review_text: row.get(5)?,
            })
        })?;

        let mut reviews = Vec::new();
        for row in rows {
            reviews.push(row?.into_review()?);
        }
        Ok(reviews)
    }

    fn read_count(&self) -> Result<u64> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row(&count_query(&self.table), [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}

#[async_trait]
impl ReviewSource for SqliteReviewSource {
    async fn fetch_reviews(&self) -> Result<Vec<Review>> {
        self.read_reviews()
    }

    async fn count_reviews(&self) -> Result<u64> {
        self.read_count()
    }

    fn describe(&self) -> String {
        format!("sqlite:{} ({})", self.path.display(), self.table)
    }
}

pub struct PostgresReviewSource {
    pool: DbPool,
    url: String,
    table: String,
}

impl PostgresReviewSource {
    pub async fn connect(database_url: &str, table: &str) -> Result<Self> {
        validate_table_name(table)?;
        let pool = init_pool(database_url).await?;
        Ok(Self {
            pool,
            url: redact(database_url),
            table: table.to_string(),
        })
    }
}

#[async_trait]
impl ReviewSource for PostgresReviewSource {
    async fn fetch_reviews(&self) -> Result<Vec<Review>> {
        let rows = sqlx::query(&review_query(&self.table))
            .fetch_all(&self.pool)
            .await?;

        let mut reviews = Vec::with_capacity(rows.len());
        for row in rows {
            let raw = RawReview {
                review_id: row.try_get(0)?,
                customer_id: row.try_get(1)?,
                product_id: row.try_get(2)?,
                review_date: row.try_get(3)?,
                rating: row.try_get(4)?,
                review_text: row.try_get(5)?,
            };
            reviews.push(raw.into_review()?);
        }
        Ok(reviews)
    }

    async fn count_reviews(&self) -> Result<u64> {
        let (count,): (i64,) = sqlx::query_as(&count_query(&self.table))
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    fn describe(&self) -> String {
        format!("{} ({})", self.url, self.table)
    }
}

/// Open the backend named by `database_url`.
pub async fn open_source(database_url: &str, table: &str) -> Result<Box<dyn ReviewSource>> {
    let source: Box<dyn ReviewSource> = match SourceKind::from_url(database_url)? {
        SourceKind::Sqlite(path) => Box::new(SqliteReviewSource::open(path, table)?),
        SourceKind::Postgres(url) => Box::new(PostgresReviewSource::connect(&url, table).await?),
    };
    info!("Opened review source {}", source.describe());
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_db(path: &Path) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(
            "CREATE TABLE customer_reviews (
                ReviewID INTEGER PRIMARY KEY,
                CustomerID INTEGER NOT NULL,
                ProductID INTEGER NOT NULL,
                ReviewDate TEXT,
                Rating INTEGER NOT NULL,
                ReviewText TEXT
            );
            INSERT INTO customer_reviews VALUES (7, 12, 3, '2024-03-01', 5, 'Great value');
            INSERT INTO customer_reviews VALUES (2, 40, 9, '2024-02-11 08:30:00', 2, NULL);
            INSERT INTO customer_reviews VALUES (5, 12, 3, '2024-01-20T12:00:00', '4', 'Fine');",
        )
        .unwrap();
    }

    #[test]
    fn test_review_query_shape() {
        let sql = review_query("dbo.customer_reviews");
        assert!(sql.starts_with("SELECT CAST(ReviewID AS BIGINT)"));
        assert!(sql.contains("CAST(ReviewDate AS TEXT)"));
        assert!(sql.ends_with("ReviewText FROM dbo.customer_reviews"));
    }

    #[test]
    fn test_parse_review_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 11).unwrap();
        assert_eq!(parse_review_date(1, "2024-02-11").unwrap(), expected);
        assert_eq!(parse_review_date(1, "2024-02-11 08:30:00").unwrap(), expected);
        assert_eq!(parse_review_date(1, "2024-02-11T08:30:00Z").unwrap(), expected);
        assert_eq!(parse_review_date(1, "2024-02-11 00:00:00+00").unwrap(), expected);

        assert!(matches!(
            parse_review_date(9, "11/02/2024"),
            Err(PipelineError::InvalidDate { review_id: 9, .. })
        ));
        assert!(parse_review_date(9, "2024-02").is_err());
        assert!(parse_review_date(9, "2024-02-110").is_err());
    }

    #[tokio::test]
    async fn test_sqlite_source_reads_in_table_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.db");
        create_db(&path);

        let source = SqliteReviewSource::open(&path, "customer_reviews").unwrap();
        let reviews = source.fetch_reviews().await.unwrap();

        let ids: Vec<i64> = reviews.iter().map(|r| r.review_id).collect();
        assert_eq!(ids, vec![2, 5, 7]);

        assert_eq!(reviews[0].review_text, None);
        assert_eq!(
            reviews[0].review_date,
            NaiveDate::from_ymd_opt(2024, 2, 11).unwrap()
        );
        assert_eq!(reviews[1].rating, 4);
        assert_eq!(reviews[2].review_text.as_deref(), Some("Great value"));

        assert_eq!(source.count_reviews().await.unwrap(), 3);
    }

    #[test]
    fn test_sqlite_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = SqliteReviewSource::open(dir.path().join("absent.db"), "customer_reviews");
        assert!(matches!(result, Err(PipelineError::Sqlite(_))));
    }

    #[tokio::test]
    async fn test_open_source_dispatches_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.db");
        create_db(&path);

        let url = format!("sqlite://{}", path.display());
        let source = open_source(&url, "customer_reviews").await.unwrap();
        assert!(source.describe().starts_with("sqlite:"));
        assert_eq!(source.fetch_reviews().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_missing_table_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.db");
        create_db(&path);

        let source = SqliteReviewSource::open(&path, "reviews_archive").unwrap();
        assert!(source.fetch_reviews().await.is_err());
    }
}
