use anyhow::{Context, Result};
use clap::Parser;
use review_sentiment::config::{Args, PipelineConfig};
use review_sentiment::pipeline;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = PipelineConfig::try_from(args).context("Invalid configuration")?;

    info!("Review sentiment run starting...");
    info!("Output: {}", config.output_path.display());

    let outcome = match pipeline::run(&config).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Run failed: {}", e);
            return Err(e.into());
        }
    };

    if let Some(preview) = &outcome.preview {
        println!("\n=== Enriched Reviews (preview) ===");
        println!("{}", preview);
    }

    let summary = &outcome.summary;
    println!("\n=== Sentiment Summary ===");
    for (category, count) in &summary.categories {
        println!("   {}: {}", category, count);
    }
    println!(
        "\n✅ Wrote {} reviews to {}",
        summary.rows_written,
        summary.output_path.display()
    );

    Ok(())
}
