//! Review sentiment pipeline
//!
//! Linear batch run: lexicon -> source -> score/classify -> CSV -> summary.

use crate::classifier::classify;
use crate::config::PipelineConfig;
use crate::db::{open_source, ReviewSource};
use crate::error::{PipelineError, Result};
use crate::output;
use crate::review::{EnrichedReview, Review, SentimentBucket, SentimentCategory};
use crate::sentiment::SentimentAnalyzer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// What a run did, suitable for logging or writing out as JSON.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub source: String,
    pub rows_read: usize,
    pub rows_written: usize,
    pub output_path: PathBuf,
    pub categories: BTreeMap<String, usize>,
    pub buckets: BTreeMap<String, usize>,
}

#[derive(Clone, Debug)]
pub struct RunOutcome {
    pub summary: RunSummary,
    /// Rendered head of the enriched table, when previews are enabled
    pub preview: Option<String>,
}

/// Score and classify each review, preserving order.
///
/// Fails on the first review whose score or rating does not validate.
pub fn enrich(reviews: Vec<Review>, analyzer: &SentimentAnalyzer) -> Result<Vec<EnrichedReview>> {
    let mut enriched = Vec::with_capacity(reviews.len());

    for review in reviews {
        if review.review_text.is_none() {
            warn!("Review {} has no text, scoring as empty", review.review_id);
        }

        let score = analyzer.score(review.text());
        let classification =
            classify(score, review.rating).map_err(|source| PipelineError::InvalidRecord {
                review_id: review.review_id,
                source,
            })?;

        debug!(
            "Review {}: score={} rating={} category={} bucket={}",
            review.review_id,
            score,
            review.rating,
            classification.category,
            classification.bucket
        );

        enriched.push(EnrichedReview {
            review,
            sentiment_score: score,
            sentiment_category: classification.category,
            sentiment_bucket: classification.bucket,
        });
    }

    Ok(enriched)
}

fn tally(rows: &[EnrichedReview]) -> (BTreeMap<String, usize>, BTreeMap<String, usize>) {
    let mut categories: BTreeMap<String, usize> = SentimentCategory::ALL
        .iter()
        .map(|c| (c.to_string(), 0))
        .collect();
    let mut buckets: BTreeMap<String, usize> = SentimentBucket::ALL
        .iter()
        .map(|b| (b.to_string(), 0))
        .collect();

    for row in rows {
        *categories
            .entry(row.sentiment_category.to_string())
            .or_default() += 1;
        *buckets.entry(row.sentiment_bucket.to_string()).or_default() += 1;
    }

    (categories, buckets)
}

/// Run against an already-open source with an already-built analyzer.
pub async fn run_with(
    source: &dyn ReviewSource,
    analyzer: &SentimentAnalyzer,
    config: &PipelineConfig,
) -> Result<RunOutcome> {
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    info!("Run {} reading reviews from {}", run_id, source.describe());

    let reviews = source.fetch_reviews().await?;
    let rows_read = reviews.len();
    info!("Fetched {} reviews", rows_read);

    let enriched = enrich(reviews, analyzer)?;
    output::write_csv(&config.output_path, &enriched)?;

    let (categories, buckets) = tally(&enriched);
    for (category, count) in &categories {
        info!("{}: {}", category, count);
    }

    let preview = if config.preview_rows > 0 {
        Some(output::preview(&enriched, config.preview_rows)?)
    } else {
        None
    };

    let summary = RunSummary {
        run_id,
        started_at,
        finished_at: Utc::now(),
        source: source.describe(),
        rows_read,
        rows_written: enriched.len(),
        output_path: config.output_path.clone(),
        categories,
        buckets,
    };

    if let Some(path) = &config.summary_path {
        write_summary(path, &summary)?;
    }

    info!("Run {} complete: {} rows written", run_id, summary.rows_written);
    Ok(RunOutcome { summary, preview })
}

/// Full run: build the analyzer first so a missing lexicon fails before any
/// database work, then open the configured source.
pub async fn run(config: &PipelineConfig) -> Result<RunOutcome> {
    let analyzer = SentimentAnalyzer::from_lexicon_file(&config.lexicon_path)?;
    let source = open_source(&config.database_url, &config.table).await?;
    run_with(source.as_ref(), &analyzer, config).await
}

pub fn write_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json)?;
    info!("Wrote run summary to {}", path.display());
    Ok(())
}
