pub mod cli;
pub mod crawler;
pub mod extract;
pub mod fetch;
pub mod selectors;

pub use cli::{handle_command, CrawlArgs};
pub use crawler::{CrawlSummary, EntryOutcome, EntryReport, ListingCrawler};
pub use extract::{extract, ExtractedFields, FieldSet};
pub use fetch::{HttpFetcher, PageFetcher};
pub use selectors::{ExtractMode, FieldSpec, SelectorConfig};

pub mod prelude {
    pub use super::crawler::ListingCrawler;
    pub use super::selectors::SelectorConfig;
    pub use bp_core::{ArticleRecord, Error, Result};
}
