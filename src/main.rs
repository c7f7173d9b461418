use ad_tracker::config::Settings;
use ad_tracker::fetcher::HttpFetcher;
use ad_tracker::logging::init_logging;
use ad_tracker::notifier::EmailNotifier;
use ad_tracker::runner::Tracker;
use ad_tracker::scrapers::ExtractorRegistry;
use ad_tracker::store::SqliteSeenStore;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "ad-tracker")]
#[command(about = "Scrape classified ads and mail a digest of new matches")]
struct Cli {
    /// Path to the YAML configuration
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Run once and exit instead of scheduling
    #[arg(long)]
    once: bool,

    /// Directory for rolling log files
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let _guard = init_logging(&cli.log_dir)?;

    info!("Starting Ad Tracker");

    let settings = Settings::load(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    let store = SqliteSeenStore::open(&settings.database.path)
        .with_context(|| format!("Failed to open database {}", settings.database.path))?;
    let fetcher = HttpFetcher::new(&settings.scraping)?;
    let extractors = ExtractorRegistry::builtin()?;
    let notifier = EmailNotifier::new(settings.email.clone());

    let mut tracker = Tracker::new(&settings, store, fetcher, extractors, notifier);

    if cli.once {
        if let Err(e) = tracker.run_once().await {
            error!(error = %e, "Error in tracker run");
            return Err(e.into());
        }
        return Ok(());
    }

    tracker
        .run_forever(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        })
        .await;

    Ok(())
}
