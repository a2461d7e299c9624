//! Check that the review source and sentiment lexicon are reachable
//!
//! Run with: cargo run --bin check_source

use clap::Parser;
use review_sentiment::config::{Args, PipelineConfig};
use review_sentiment::db::{open_source, redact};
use review_sentiment::sentiment::SentimentAnalyzer;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    println!("🔌 Checking review source and sentiment lexicon...\n");

    let config = match PipelineConfig::try_from(Args::parse()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            eprintln!("   Please set DATABASE_URL in your .env file:");
            eprintln!("   DATABASE_URL=sqlite://marketing_analysis.db");
            return Err(e.into());
        }
    };

    println!("📖 Loading lexicon: {}", config.lexicon_path.display());
    match SentimentAnalyzer::from_lexicon_file(&config.lexicon_path) {
        Ok(analyzer) => {
            println!("✅ Lexicon loaded: {} entries", analyzer.lexicon().len());
            let sample = "Great product, love it!";
            println!("   🧪 '{}' scores {}\n", sample, analyzer.score(sample));
        }
        Err(e) => {
            eprintln!("❌ Lexicon check failed: {}", e);
            eprintln!("\n💡 Set VADER_LEXICON or pass --lexicon with the path to vader_lexicon.txt");
            return Err(e.into());
        }
    }

    println!("📡 Connecting to: {}", redact(&config.database_url));
    let source = match open_source(&config.database_url, &config.table).await {
        Ok(source) => source,
        Err(e) => {
            eprintln!("❌ Connection failed: {}", e);
            eprintln!("\n💡 Troubleshooting:");
            eprintln!("   1. Is DATABASE_URL a SQLite path or a postgres:// URL?");
            eprintln!("   2. Does the SQLite file exist / is PostgreSQL running?");
            eprintln!("   3. Are the username and password correct?");
            return Err(e.into());
        }
    };
    println!("✅ Connected to {}\n", source.describe());

    println!("🧪 Counting reviews in '{}'...", config.table);
    match source.count_reviews().await {
        Ok(count) => println!("   📊 Reviews in table: {}", count),
        Err(e) => {
            eprintln!("❌ Could not read table '{}': {}", config.table, e);
            eprintln!("\n💡 Check REVIEWS_TABLE and that the table has the review columns");
            return Err(e.into());
        }
    }

    println!("\n✅ Source check completed successfully!");
    println!("   You're ready to run review-sentiment.");

    Ok(())
}
