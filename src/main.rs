use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use urlwarden::cache::MemoryCache;
use urlwarden::checker::UrlChecker;
use urlwarden::config::CheckerConfig;
use urlwarden::output;
use urlwarden::provider::{
    IpQualityScoreProvider, PhishTankProvider, SafeBrowsingProvider, VirusTotalProvider,
};
use urlwarden::result::Consensus;

/// Urlwarden: URL safety checking across reputation providers.
///
/// Queries every configured provider for a URL, caches their verdicts,
/// and reduces them to one decision under a consensus policy.
#[derive(Parser)]
#[command(name = "urlwarden", version, about)]
struct Cli {
    /// Consensus policy: any, all or majority
    #[arg(long, global = true, default_value = "any")]
    consensus: String,

    /// Only query these providers (comma-separated names)
    #[arg(long, global = true, value_delimiter = ',')]
    providers: Vec<String>,

    /// Disable verdict caching
    #[arg(long, global = true)]
    no_cache: bool,

    /// Per-attempt provider timeout in seconds
    #[arg(long, global = true, default_value = "5")]
    timeout: u64,

    /// Retries after a failed provider call
    #[arg(long, global = true, default_value = "1")]
    retries: u32,

    /// Max concurrent provider calls
    #[arg(long, global = true, default_value = "8")]
    concurrency: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a single URL
    Check {
        /// The URL to check (a bare host defaults to http://)
        url: String,
    },

    /// Check multiple URLs
    Batch {
        /// The URLs to check
        urls: Vec<String>,
    },

    /// List the providers configured via environment variables
    Providers,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("urlwarden=info")),
        )
        .init();

    let cli = Cli::parse();

    let consensus: Consensus = cli.consensus.parse()?;
    let subset: Option<&[String]> = if cli.providers.is_empty() {
        None
    } else {
        Some(&cli.providers)
    };

    let checker = build_checker(&cli)?;

    match &cli.command {
        Commands::Check { url } => {
            let result = checker.check(url, subset, consensus).await?;
            output::display_aggregate(&result);
        }

        Commands::Batch { urls } => {
            if urls.is_empty() {
                anyhow::bail!("no URLs given");
            }

            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("  {spinner} Checking {len} URLs...")
                    .unwrap(),
            );
            pb.set_length(urls.len() as u64);
            pb.enable_steady_tick(Duration::from_millis(100));

            let results = checker.check_batch(urls, subset, consensus).await?;
            pb.finish_and_clear();

            output::display_batch_summary(&results);
        }

        Commands::Providers => {
            let names = checker.provider_names();
            println!("Configured providers ({}):", names.len());
            for name in names {
                println!("  {name}");
            }
            println!("\nProviders are enabled by setting their API key env var");
            println!("(see .env.example).");
        }
    }

    Ok(())
}

/// Assemble a checker from CLI flags and environment API keys. Each
/// provider is registered only when its key is present.
fn build_checker(cli: &Cli) -> Result<UrlChecker> {
    let mut config = CheckerConfig::new()
        .with_timeout(Duration::from_secs(cli.timeout))
        .with_retries(cli.retries)
        .with_concurrency(cli.concurrency);

    if !cli.no_cache {
        config = config.with_cache(Arc::new(MemoryCache::new()));
    }

    let mut checker = UrlChecker::with_config(config);

    if let Ok(key) = std::env::var("SAFEBROWSING_API_KEY") {
        checker.add_provider(Arc::new(SafeBrowsingProvider::new(key)));
    }
    if let Ok(key) = std::env::var("PHISHTANK_API_KEY") {
        checker.add_provider(Arc::new(PhishTankProvider::new(key)));
    }
    if let Ok(key) = std::env::var("VIRUSTOTAL_API_KEY") {
        checker.add_provider(Arc::new(VirusTotalProvider::new(key)));
    }
    if let Ok(key) = std::env::var("IPQUALITYSCORE_API_KEY") {
        checker.add_provider(Arc::new(IpQualityScoreProvider::new(key)));
    }

    if checker.provider_names().is_empty() {
        anyhow::bail!(
            "No providers configured. Set at least one API key env var:\n\
             SAFEBROWSING_API_KEY, PHISHTANK_API_KEY, VIRUSTOTAL_API_KEY,\n\
             IPQUALITYSCORE_API_KEY (or put them in a .env file)."
        );
    }

    info!(
        providers = checker.provider_names().len(),
        "checker assembled"
    );

    Ok(checker)
}
