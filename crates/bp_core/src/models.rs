use async_trait::async_trait;
use std::fmt;
use crate::types::StoredArticle;
use crate::Result;

#[async_trait]
pub trait ContentGenerator: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Produce replacement content for an article
    async fn generate(&self, article: &StoredArticle) -> Result<String>;
}
