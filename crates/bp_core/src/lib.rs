pub mod error;
pub mod logging;
pub mod models;
pub mod storage;
pub mod types;

pub use error::Error;
pub use models::ContentGenerator;
pub use storage::ArticleStore;
pub use types::{ArticleRecord, ArticleUpdate, CandidateEntry, StoredArticle};

pub type Result<T> = std::result::Result<T, Error>;

/// Author recorded when a listing entry carries no byline.
pub const DEFAULT_AUTHOR: &str = "BeyondChats Team";
