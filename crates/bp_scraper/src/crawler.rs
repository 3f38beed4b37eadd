//! One crawl pass over a blog listing page.
//!
//! The listing is fetched once and reduced to candidate entries in document
//! order. Each candidate is then resolved on its own: duplicate check, detail
//! page fetch, body extraction, create. A failing entry becomes a
//! [`EntryOutcome::SkippedError`] in the summary and the pass moves on; only a
//! failed listing fetch aborts the pass.

use bp_core::logging::Logger;
use bp_core::{ArticleStore, CandidateEntry, Error, Result, DEFAULT_AUTHOR};
use scraper::Html;
use std::fmt;
use std::sync::Arc;
use url::Url;

use crate::fetch::PageFetcher;
use crate::selectors::{
    CompiledSelectors, SelectorConfig, FIELD_AUTHOR, FIELD_CONTENT, FIELD_DESCRIPTION,
    FIELD_IMAGE_URL, FIELD_TITLE, FIELD_URL,
};

pub const DEFAULT_LISTING_URL: &str = "https://beyondchats.com/blogs/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Saved { id: i64 },
    SkippedDuplicate,
    SkippedError { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryReport {
    /// Position in the listing, starting at 1
    pub position: usize,
    pub title: Option<String>,
    pub url: Option<String>,
    pub outcome: EntryOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    pub reports: Vec<EntryReport>,
}

impl CrawlSummary {
    pub fn saved(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Saved { .. }))
    }

    pub fn skipped_duplicate(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::SkippedDuplicate))
    }

    pub fn skipped_error(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::SkippedError { .. }))
    }

    pub fn saved_urls(&self) -> Vec<&str> {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, EntryOutcome::Saved { .. }))
            .filter_map(|r| r.url.as_deref())
            .collect()
    }

    fn count(&self, pred: impl Fn(&EntryOutcome) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.outcome)).count()
    }
}

impl fmt::Display for CrawlSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entries: {} saved, {} duplicates skipped, {} failed",
            self.reports.len(),
            self.saved(),
            self.skipped_duplicate(),
            self.skipped_error()
        )
    }
}

/// A listing entry that could not become a candidate.
#[derive(Debug)]
struct EntryGap {
    title: Option<String>,
    error: Error,
}

pub struct ListingCrawler {
    fetcher: Arc<dyn PageFetcher>,
    store: Arc<dyn ArticleStore>,
    listing_url: Url,
    selectors: CompiledSelectors,
    fallback_author: String,
    logger: Logger,
}

impl fmt::Debug for ListingCrawler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListingCrawler")
            .field("listing_url", &self.listing_url.as_str())
            .field("fallback_author", &self.fallback_author)
            .finish()
    }
}

impl ListingCrawler {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        store: Arc<dyn ArticleStore>,
        listing_url: &str,
        selectors: &SelectorConfig,
    ) -> Result<Self> {
        let listing_url = Url::parse(listing_url)
            .map_err(|e| Error::Config(format!("Invalid listing url '{}': {}", listing_url, e)))?;

        Ok(Self {
            fetcher,
            store,
            listing_url,
            selectors: selectors.compile()?,
            fallback_author: DEFAULT_AUTHOR.to_string(),
            logger: Logger::new().with_prefix("[crawl]"),
        })
    }

    pub fn with_fallback_author(mut self, author: impl Into<String>) -> Self {
        self.fallback_author = author.into();
        self
    }

    /// Runs one pass. Errors only when the listing page itself cannot be fetched.
    pub async fn crawl(&self) -> Result<CrawlSummary> {
        self.logger.info(&format!("Fetching listing page {}", self.listing_url));
        let html = self.fetcher.fetch(self.listing_url.as_str()).await.map_err(|e| {
            self.logger.error(&format!("Failed to fetch listing page: {}", e));
            e
        })?;

        let entries = self.parse_listing(&html);
        let total = entries.len();
        self.logger.info(&format!("Found {} entries", total));

        let mut summary = CrawlSummary::default();
        for (i, entry) in entries.into_iter().enumerate() {
            let logger = self.logger.clone().with_prefix(format!("[entry {}/{}]", i + 1, total));
            let report = match entry {
                Ok(candidate) => self.process_candidate(i + 1, candidate, &logger).await,
                Err(gap) => {
                    logger.warn(&format!("Skipping entry: {}", gap.error));
                    EntryReport {
                        position: i + 1,
                        title: gap.title,
                        url: None,
                        outcome: EntryOutcome::SkippedError {
                            reason: gap.error.to_string(),
                        },
                    }
                }
            };
            summary.reports.push(report);
        }

        self.logger.info(&format!("Scraping completed: {}", summary));
        Ok(summary)
    }

    /// Document order is preserved. The parsed document does not outlive this call.
    fn parse_listing(&self, html: &str) -> Vec<std::result::Result<CandidateEntry, EntryGap>> {
        let document = Html::parse_document(html);
        document
            .select(&self.selectors.entry)
            .map(|node| {
                let fields = self.selectors.entry_fields.extract_from(node);
                self.candidate_from(fields)
            })
            .collect()
    }

    fn candidate_from(
        &self,
        mut fields: crate::extract::ExtractedFields,
    ) -> std::result::Result<CandidateEntry, EntryGap> {
        let title = fields.take(FIELD_TITLE).ok_or_else(|| EntryGap {
            title: None,
            error: Error::Extraction("entry has no title".to_string()),
        })?;

        let href = fields
            .take(FIELD_URL)
            .map(|href| href.trim().to_string())
            .filter(|href| !href.is_empty())
            .ok_or_else(|| EntryGap {
                title: Some(title.clone()),
                error: Error::Extraction(format!("entry '{}' has no link", title)),
            })?;
        let url = self.listing_url.join(&href).map_err(|e| EntryGap {
            title: Some(title.clone()),
            error: Error::Extraction(format!("entry link '{}' is not a valid url: {}", href, e)),
        })?;

        let image_url = fields
            .take(FIELD_IMAGE_URL)
            .map(|src| src.trim().to_string())
            .filter(|src| !src.is_empty())
            .map(|src| self.listing_url.join(&src).map(String::from).unwrap_or(src));

        Ok(CandidateEntry {
            title,
            url: url.to_string(),
            image_url,
            description: fields.take(FIELD_DESCRIPTION).unwrap_or_default(),
            author: fields
                .take(FIELD_AUTHOR)
                .unwrap_or_else(|| self.fallback_author.clone()),
        })
    }

    async fn process_candidate(
        &self,
        position: usize,
        candidate: CandidateEntry,
        logger: &Logger,
    ) -> EntryReport {
        let title = candidate.title.clone();
        let url = candidate.url.clone();

        let outcome = match self.resolve_candidate(candidate, logger).await {
            Ok(outcome) => outcome,
            Err(e) => {
                logger.error(&format!("Error: {}", e));
                EntryOutcome::SkippedError {
                    reason: e.to_string(),
                }
            }
        };

        EntryReport {
            position,
            title: Some(title),
            url: Some(url),
            outcome,
        }
    }

    async fn resolve_candidate(&self, candidate: CandidateEntry, logger: &Logger) -> Result<EntryOutcome> {
        if self.store.find_by_url(&candidate.url).await?.is_some() {
            logger.info(&format!("Skipping existing: {}", candidate.title));
            return Ok(EntryOutcome::SkippedDuplicate);
        }

        logger.info(&format!("Fetching full content for: {}", candidate.title));
        let body = self.fetcher.fetch(&candidate.url).await?;
        let content = self.extract_content(&body).ok_or_else(|| {
            Error::Extraction(format!("detail page {} has no article body", candidate.url))
        })?;

        match self.store.create_article(&candidate.into_record(content)).await {
            Ok(stored) => {
                logger.info(&format!("Saved successfully (id {})", stored.id));
                Ok(EntryOutcome::Saved { id: stored.id })
            }
            Err(Error::Conflict(url)) => {
                logger.info(&format!("Skipping existing: {} was stored concurrently", url));
                Ok(EntryOutcome::SkippedDuplicate)
            }
            Err(e) => Err(e),
        }
    }

    fn extract_content(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let mut fields = self.selectors.detail_fields.extract_document(&document);
        fields.take(FIELD_CONTENT)
    }
}
