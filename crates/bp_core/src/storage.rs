use async_trait::async_trait;
use crate::types::{ArticleRecord, ArticleUpdate, StoredArticle};
use crate::Result;

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// All articles, most recently created first
    async fn list_articles(&self) -> Result<Vec<StoredArticle>>;

    /// Look up an article by its source url
    async fn find_by_url(&self, url: &str) -> Result<Option<StoredArticle>>;

    /// Persist a new article. Fails with `Error::Conflict` if the url is already stored.
    async fn create_article(&self, record: &ArticleRecord) -> Result<StoredArticle>;

    /// Apply a partial update. Fails with `Error::NotFound` for an unknown id.
    async fn update_article(&self, id: i64, update: ArticleUpdate) -> Result<StoredArticle>;
}
