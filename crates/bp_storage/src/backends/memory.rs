use async_trait::async_trait;
use bp_core::{ArticleRecord, ArticleStore, ArticleUpdate, Error, Result, StoredArticle};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStore {
    articles: Vec<StoredArticle>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            articles: Vec::new(),
            next_id: 1,
        }
    }

    pub fn list_articles(&self) -> Vec<StoredArticle> {
        let mut articles = self.articles.clone();
        articles.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        articles
    }

    pub fn find_by_url(&self, url: &str) -> Option<StoredArticle> {
        self.articles.iter().find(|a| a.record.url == url).cloned()
    }

    pub fn create_article(&mut self, record: &ArticleRecord) -> Result<StoredArticle> {
        if self.articles.iter().any(|a| a.record.url == record.url) {
            return Err(Error::Conflict(record.url.clone()));
        }
        let now = Utc::now();
        let article = StoredArticle {
            id: self.next_id,
            record: record.clone(),
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.next_id += 1;
        self.articles.push(article.clone());
        Ok(article)
    }

    pub fn update_article(&mut self, id: i64, update: ArticleUpdate) -> Result<StoredArticle> {
        let article = self
            .articles
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(Error::NotFound(id))?;
        update.apply(&mut article.record);
        article.updated_at = Some(Utc::now());
        Ok(article.clone())
    }
}

/// Process-local store. Uniqueness is checked and enforced under one write lock.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(MemoryStore::new())),
        }
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.articles.len()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArticleStore for MemoryStorage {
    async fn list_articles(&self) -> Result<Vec<StoredArticle>> {
        let store = self.store.read().await;
        Ok(store.list_articles())
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<StoredArticle>> {
        let store = self.store.read().await;
        Ok(store.find_by_url(url))
    }

    async fn create_article(&self, record: &ArticleRecord) -> Result<StoredArticle> {
        let mut store = self.store.write().await;
        store.create_article(record)
    }

    async fn update_article(&self, id: i64, update: ArticleUpdate) -> Result<StoredArticle> {
        let mut store = self.store.write().await;
        store.update_article(id, update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str) -> ArticleRecord {
        ArticleRecord {
            url: url.to_string(),
            title: "Test Article".to_string(),
            description: String::new(),
            image_url: None,
            author: "Test Author".to_string(),
            content: "<p>original</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = MemoryStorage::new();
        let created = storage.create_article(&record("http://test.com/a")).await.unwrap();
        assert_eq!(created.id, 1);

        let found = storage.find_by_url("http://test.com/a").await.unwrap();
        assert_eq!(found, Some(created));
        assert!(storage.find_by_url("http://test.com/b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_url() {
        let storage = MemoryStorage::new();
        storage.create_article(&record("http://test.com/a")).await.unwrap();
        let second = storage.create_article(&record("http://test.com/a")).await;
        assert!(matches!(second, Err(Error::Conflict(url)) if url == "http://test.com/a"));
        assert_eq!(storage.len().await, 1);
    }

    #[tokio::test]
    async fn test_list_is_most_recent_first() {
        let storage = MemoryStorage::new();
        for url in ["http://test.com/a", "http://test.com/b", "http://test.com/c"] {
            storage.create_article(&record(url)).await.unwrap();
        }
        let urls: Vec<String> = storage
            .list_articles()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.record.url)
            .collect();
        assert_eq!(urls, vec!["http://test.com/c", "http://test.com/b", "http://test.com/a"]);
    }

    #[tokio::test]
    async fn test_update_replaces_content_only() {
        let storage = MemoryStorage::new();
        let created = storage.create_article(&record("http://test.com/a")).await.unwrap();

        let updated = storage
            .update_article(created.id, ArticleUpdate::content("<div>new</div>"))
            .await
            .unwrap();
        assert_eq!(updated.record.content, "<div>new</div>");
        assert_eq!(updated.record.title, created.record.title);
        assert_eq!(updated.record.url, created.record.url);
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let storage = MemoryStorage::new();
        let result = storage.update_article(42, ArticleUpdate::content("x")).await;
        assert!(matches!(result, Err(Error::NotFound(42))));
    }
}
