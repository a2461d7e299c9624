//! Pipeline configuration
//!
//! `Args` is the command line surface (each flag can also come from the
//! environment or a `.env` file); `PipelineConfig` is the validated form the
//! library works with.

use crate::error::{PipelineError, Result};
use clap::Parser;
use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;

pub const DEFAULT_TABLE: &str = "customer_reviews";
pub const DEFAULT_LEXICON: &str = "vader_lexicon.txt";
pub const DEFAULT_OUTPUT: &str = "customer_reviews_with_sentiment.csv";

#[derive(Parser, Debug, Clone)]
#[command(name = "review-sentiment")]
#[command(about = "Score customer review sentiment and export an enriched CSV")]
pub struct Args {
    /// Source database: a SQLite path/URL or a postgres:// URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Table holding the reviews (optionally schema-qualified)
    #[arg(long, env = "REVIEWS_TABLE", default_value = DEFAULT_TABLE)]
    pub table: String,

    /// Path to the VADER lexicon file
    #[arg(long, env = "VADER_LEXICON", default_value = DEFAULT_LEXICON)]
    pub lexicon: PathBuf,

    /// Where to write the enriched CSV
    #[arg(short, long, env = "SENTIMENT_OUTPUT", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Number of rows to print as a preview (0 disables it)
    #[arg(long, default_value_t = 5)]
    pub preview_rows: usize,

    /// Optional path for a JSON run summary
    #[arg(long, env = "SENTIMENT_SUMMARY")]
    pub summary: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub database_url: String,
    pub table: String,
    pub lexicon_path: PathBuf,
    pub output_path: PathBuf,
    pub preview_rows: usize,
    pub summary_path: Option<PathBuf>,
}

impl PipelineConfig {
    pub fn new(
        database_url: impl Into<String>,
        table: impl Into<String>,
        lexicon_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Result<Self> {
        let config = Self {
            database_url: database_url.into(),
            table: table.into(),
            lexicon_path: lexicon_path.into(),
            output_path: output_path.into(),
            preview_rows: 0,
            summary_path: None,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    pub fn with_summary_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.summary_path = Some(path.into());
        self
    }

    fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            return Err(PipelineError::Config("database URL is empty".to_string()));
        }
        validate_table_name(&self.table)
    }
}

impl TryFrom<Args> for PipelineConfig {
    type Error = PipelineError;

    fn try_from(args: Args) -> Result<Self> {
        let mut config = Self::new(args.database_url, args.table, args.lexicon, args.output)?
            .with_preview_rows(args.preview_rows);
        config.summary_path = args.summary;
        Ok(config)
    }
}

fn table_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
            .expect("table name pattern is valid")
    })
}

/// Table names are spliced into SQL text, so only plain identifiers pass.
pub fn validate_table_name(table: &str) -> Result<()> {
    if table_name_pattern().is_match(table) {
        Ok(())
    } else {
        Err(PipelineError::Config(format!(
            "invalid table name '{}': expected an identifier such as \
             customer_reviews or dbo.customer_reviews",
            table
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names() {
        assert!(validate_table_name("customer_reviews").is_ok());
        assert!(validate_table_name("dbo.customer_reviews").is_ok());
        assert!(validate_table_name("_staging2").is_ok());

        assert!(validate_table_name("").is_err());
        assert!(validate_table_name("reviews; DROP TABLE reviews").is_err());
        assert!(validate_table_name("a.b.c").is_err());
        assert!(validate_table_name("1reviews").is_err());
    }

    #[test]
    fn test_args_defaults() {
        let env_keys = [
            "DATABASE_URL",
            "REVIEWS_TABLE",
            "VADER_LEXICON",
            "SENTIMENT_OUTPUT",
            "SENTIMENT_SUMMARY",
        ];
        temp_env::with_vars_unset(env_keys, || {
            let args = Args::try_parse_from([
                "review-sentiment",
                "--database-url",
                "sqlite://reviews.db",
            ])
            .unwrap();

            let config = PipelineConfig::try_from(args).unwrap();
            assert_eq!(config.table, DEFAULT_TABLE);
            assert_eq!(config.lexicon_path, PathBuf::from(DEFAULT_LEXICON));
            assert_eq!(config.output_path, PathBuf::from(DEFAULT_OUTPUT));
            assert_eq!(config.preview_rows, 5);
            assert!(config.summary_path.is_none());
        });
    }

    #[test]
    fn test_args_env_fallback() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("sqlite://env.db")),
                ("REVIEWS_TABLE", Some("dbo.customer_reviews")),
                ("VADER_LEXICON", None),
                ("SENTIMENT_OUTPUT", None),
                ("SENTIMENT_SUMMARY", Some("summary.json")),
            ],
            || {
                let args = Args::try_parse_from(["review-sentiment"]).unwrap();
                let config = PipelineConfig::try_from(args).unwrap();
                assert_eq!(config.database_url, "sqlite://env.db");
                assert_eq!(config.table, "dbo.customer_reviews");
                assert_eq!(config.lexicon_path, PathBuf::from(DEFAULT_LEXICON));
                assert_eq!(config.summary_path, Some(PathBuf::from("summary.json")));
            },
        );
    }

    #[test]
    fn test_args_reject_bad_table() {
        let args = Args::try_parse_from([
            "review-sentiment",
            "--database-url",
            "sqlite://reviews.db",
            "--table",
            "reviews where 1=1",
        ])
        .unwrap();

        assert!(matches!(
            PipelineConfig::try_from(args),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn test_empty_database_url() {
        assert!(PipelineConfig::new(" ", DEFAULT_TABLE, DEFAULT_LEXICON, DEFAULT_OUTPUT).is_err());
    }
}
