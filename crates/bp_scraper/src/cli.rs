use bp_core::{ArticleStore, Result, DEFAULT_AUTHOR};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use crate::crawler::{CrawlSummary, EntryOutcome, ListingCrawler, DEFAULT_LISTING_URL};
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::selectors::SelectorConfig;

#[derive(Args, Debug, Clone)]
pub struct CrawlArgs {
    /// Blog index page to crawl
    #[arg(long, env = "LISTING_URL", default_value = DEFAULT_LISTING_URL)]
    pub listing_url: String,

    /// JSON file overriding the built-in field selectors
    #[arg(long, env = "SELECTORS_FILE")]
    pub selectors: Option<PathBuf>,

    /// Author recorded for entries without a byline
    #[arg(long, default_value = DEFAULT_AUTHOR)]
    pub fallback_author: String,
}

impl CrawlArgs {
    pub fn selector_config(&self) -> Result<SelectorConfig> {
        match &self.selectors {
            Some(path) => SelectorConfig::load(path),
            None => Ok(SelectorConfig::default()),
        }
    }
}

pub async fn handle_command(args: CrawlArgs, store: Arc<dyn ArticleStore>) -> Result<CrawlSummary> {
    let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new()?);
    crawl_with(args, fetcher, store).await
}

pub async fn crawl_with(
    args: CrawlArgs,
    fetcher: Arc<dyn PageFetcher>,
    store: Arc<dyn ArticleStore>,
) -> Result<CrawlSummary> {
    let selectors = args.selector_config()?;
    let crawler = ListingCrawler::new(fetcher, store, &args.listing_url, &selectors)?
        .with_fallback_author(args.fallback_author);

    let summary = crawler.crawl().await?;
    for report in &summary.reports {
        let label = match &report.outcome {
            EntryOutcome::Saved { .. } => "saved",
            EntryOutcome::SkippedDuplicate => "skipped (duplicate)",
            EntryOutcome::SkippedError { .. } => "skipped (error)",
        };
        tracing::debug!(
            position = report.position,
            title = report.title.as_deref().unwrap_or("<untitled>"),
            outcome = label,
            "entry outcome"
        );
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bp_core::Error;
    use std::io::Write;

    fn args(selectors: Option<PathBuf>) -> CrawlArgs {
        CrawlArgs {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            selectors,
            fallback_author: DEFAULT_AUTHOR.to_string(),
        }
    }

    #[test]
    fn test_default_selectors_without_file() {
        assert_eq!(args(None).selector_config().unwrap(), SelectorConfig::default());
    }

    #[test]
    fn test_selectors_loaded_from_file() {
        let mut config = SelectorConfig::default();
        config.entry = "div.post".to_string();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&config).unwrap().as_bytes()).unwrap();

        let loaded = args(Some(file.path().to_path_buf())).selector_config().unwrap();
        assert_eq!(loaded.entry, "div.post");
    }

    #[test]
    fn test_missing_selector_file() {
        let result = args(Some(PathBuf::from("/nonexistent/selectors.json"))).selector_config();
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
