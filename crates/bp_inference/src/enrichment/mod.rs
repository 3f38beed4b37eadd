//! One enrichment cycle: take the first article the store lists, have the
//! configured generator rewrite its content, and write the result back.
//!
//! ```text
//! Start -> Fetching -> (empty) Done
//!                   -> Generating -> Writing -> Done
//! any failure -> Failed
//! ```
//!
//! There is no "already enriched" marker, so repeated cycles keep picking the
//! most recent article.

use std::fmt;
use std::sync::Arc;

use bp_core::logging::Logger;
use bp_core::{ArticleStore, ArticleUpdate, ContentGenerator, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Start,
    Fetching,
    Generating,
    Writing,
    Done,
    Failed,
}

impl fmt::Display for CycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Fetching => "fetching",
            Self::Generating => "generating",
            Self::Writing => "writing",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The store had nothing to enrich
    Empty,
    Enriched { id: i64, title: String, bytes: usize },
}

pub struct EnrichmentAgent {
    store: Arc<dyn ArticleStore>,
    generator: Arc<dyn ContentGenerator>,
    logger: Logger,
}

impl fmt::Debug for EnrichmentAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnrichmentAgent")
            .field("store", &"<dyn ArticleStore>")
            .field("generator", &self.generator)
            .finish()
    }
}

impl EnrichmentAgent {
    pub fn new(store: Arc<dyn ArticleStore>, generator: Arc<dyn ContentGenerator>) -> Self {
        Self {
            store,
            generator,
            logger: Logger::new().with_prefix("[enrich]"),
        }
    }

    /// Runs exactly one cycle. Failures are logged and returned, never retried.
    pub async fn run_cycle(&self) -> Result<CycleOutcome> {
        let mut state = CycleState::Start;
        match self.drive(&mut state).await {
            Ok(outcome) => {
                self.advance(&mut state, CycleState::Done);
                Ok(outcome)
            }
            Err(e) => {
                self.logger.error(&format!("An error occurred while {}: {}", state, e));
                self.advance(&mut state, CycleState::Failed);
                Err(e)
            }
        }
    }

    async fn drive(&self, state: &mut CycleState) -> Result<CycleOutcome> {
        self.advance(state, CycleState::Fetching);
        self.logger.info("Fetching pending articles from the article store...");
        let articles = self.store.list_articles().await.map_err(|e| match e {
            Error::SourceUnavailable(_) => e,
            other => Error::SourceUnavailable(other.to_string()),
        })?;

        let Some(article) = articles.into_iter().next() else {
            self.logger.warn("No articles found in the store. Nothing to do.");
            return Ok(CycleOutcome::Empty);
        };
        self.logger.info(&format!("Processing article {}: \"{}\"", article.id, article.title()));

        self.advance(state, CycleState::Generating);
        self.logger.info(&format!("Generating enhanced content with {}...", self.generator.name()));
        let content = self.generator.generate(&article).await.map_err(|e| match e {
            Error::Generation(_) => e,
            other => Error::Generation(other.to_string()),
        })?;

        self.advance(state, CycleState::Writing);
        self.logger.info("Updating record in the article store...");
        let bytes = content.len();
        self.store
            .update_article(article.id, ArticleUpdate::content(content))
            .await
            .map_err(|e| match e {
                Error::NotFound(_) | Error::Persist(_) => e,
                other => Error::Persist(other.to_string()),
            })?;

        self.logger.info("Article updated successfully. Process complete.");
        Ok(CycleOutcome::Enriched {
            id: article.id,
            title: article.record.title,
            bytes,
        })
    }

    fn advance(&self, state: &mut CycleState, next: CycleState) {
        self.logger.debug(&format!("{} -> {}", state, next));
        *state = next;
    }
}
