use bp_core::logging::init_logging;
use anyhow::{Context, Result};
use bp_core::ArticleStore;
use bp_inference::{Config, CycleOutcome, EnrichmentAgent, GeneratorKind};
use bp_scraper::cli::{handle_command, CrawlArgs};
use bp_scraper::CrawlSummary;
use bp_storage::StorageKind;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "blogpipe", author, version, about = "Crawl a blog listing and enrich the stored articles", long_about = None)]
pub struct Cli {
    /// Article store backend: memory, sqlite or http
    #[arg(long, env = "ARTICLE_STORAGE", default_value = "sqlite", global = true)]
    storage: StorageKind,
    /// SQLite database path (sqlite backend)
    #[arg(long, env = "DATABASE_PATH", global = true)]
    database: Option<String>,
    /// Base url of the article CRUD API (http backend)
    #[arg(long, env = "ARTICLES_API_URL", global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Crawl the listing page and store new articles
    Crawl(CrawlArgs),
    /// Rewrite the content of the most recent article
    Enrich {
        #[arg(long, env = "CONTENT_GENERATOR", default_value = "mock")]
        generator: GeneratorKind,
        #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
        gemini_api_key: Option<String>,
        #[arg(long, env = "GEMINI_MODEL")]
        gemini_model: Option<String>,
        #[arg(long, env = "GEMINI_BASE_URL")]
        gemini_base_url: Option<String>,
    },
}

impl Cli {
    fn store_location(&self) -> Option<&str> {
        match self.storage {
            StorageKind::Sqlite => self.database.as_deref(),
            StorageKind::Http => self.api_url.as_deref(),
            StorageKind::Memory => None,
        }
    }
}

fn summary_lines(summary: &CrawlSummary) -> Vec<String> {
    std::iter::once(summary.to_string())
        .chain(summary.saved_urls().into_iter().map(|url| format!("  + {}", url)))
        .collect()
}

async fn run(cli: Cli) -> Result<()> {
    let store: Arc<dyn ArticleStore> = bp_storage::create_storage(cli.storage, cli.store_location())
        .await
        .with_context(|| format!("Failed to open {} article store", cli.storage))?;
    info!("💾 Article store ready (using {})", cli.storage);

    match cli.command {
        Commands::Crawl(args) => {
            info!("🦗 Crawling {}", args.listing_url);
            let listing_url = args.listing_url.clone();
            let summary = handle_command(args, store)
                .await
                .with_context(|| format!("Crawl of {} failed", listing_url))?;
            for line in summary_lines(&summary) {
                info!("{}", line);
            }
        }
        Commands::Enrich {
            generator,
            gemini_api_key,
            gemini_model,
            gemini_base_url,
        } => {
            let config = Config {
                kind: generator,
                api_key: gemini_api_key,
                model_name: gemini_model,
                base_url: gemini_base_url,
            };
            let generator =
                bp_inference::create_generator(Some(config)).context("Failed to set up content generator")?;
            info!("🧠 Content generator ready (using {})", generator.name());

            let agent = EnrichmentAgent::new(store, generator);
            match agent.run_cycle().await.context("Enrichment cycle failed")? {
                CycleOutcome::Empty => info!("Nothing to enrich"),
                CycleOutcome::Enriched { id, title, bytes } => {
                    info!("✨ Enriched article {} \"{}\" ({} bytes)", id, title, bytes)
                }
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
