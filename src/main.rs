use clap::{Parser, Subcommand};
use poster_crawler::config::CrawlConfig;
use poster_crawler::constants::DEFAULT_CONFIG_PATH;
use poster_crawler::dataset::{self, Snapshot};
use poster_crawler::infra::http_client::ReqwestHttp;
use poster_crawler::logging;
use poster_crawler::orchestrator::CrawlOrchestrator;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "poster_crawler")]
#[command(about = "Discover poster images for event homepages")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl every event homepage and write an updated dataset
    Crawl {
        /// Input dataset (JSON array, snapshot document, or JS data module)
        #[arg(long)]
        input: PathBuf,
        /// Where to write the updated dataset (.js for a JS module, JSON otherwise)
        #[arg(long)]
        output: PathBuf,
        /// Optional TOML config file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
        /// Per-request timeout, overrides the config file
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Pause between events, overrides the config file
        #[arg(long)]
        delay_ms: Option<u64>,
        /// Crawl and report but don't write the dataset
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl {
            input,
            output,
            config,
            timeout_secs,
            delay_ms,
            dry_run,
        } => {
            let mut config = CrawlConfig::load(&config)?.with_env_overrides()?;
            if let Some(secs) = timeout_secs {
                config.timeout_secs = secs;
            }
            if let Some(ms) = delay_ms {
                config.delay_ms = ms;
            }
            config.validate()?;

            let events = dataset::load_events(&input)?;
            println!("🔍 Crawling poster URLs...");
            println!("   Total events: {}\n", events.len());

            let http = Arc::new(ReqwestHttp::new(&config)?);
            let orchestrator = CrawlOrchestrator::from_config(http, &config);

            // A run is all-or-nothing: Ctrl-C abandons it before anything is written
            let summary = tokio::select! {
                summary = orchestrator.run(&events) => summary,
                _ = tokio::signal::ctrl_c() => {
                    warn!("Interrupted, no dataset written");
                    println!("\n⚠️  Interrupted, no dataset written");
                    return Ok(());
                }
            };

            println!("\n✅ Done! succeeded: {}, failed: {}", summary.found, summary.not_found);
            for (reason, count) in &summary.misses {
                println!("   - {}: {}", reason, count);
            }
            println!("   Took {:.1}s", summary.elapsed.as_secs_f64());

            if dry_run {
                info!("Dry run, skipping dataset write");
                println!("\n(dry run, nothing written)");
                return Ok(());
            }

            let written = dataset::write_snapshot(&output, &Snapshot::from_summary(&summary))?;
            info!("Saved updated dataset to {}", written.display());
            println!("\n💾 Saved: {}", written.display());
        }
    }
    Ok(())
}
