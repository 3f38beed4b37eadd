use async_trait::async_trait;
use bp_core::{ArticleRecord, ArticleStore, ArticleUpdate, Error, Result, StoredArticle};
use reqwest::{Client, StatusCode};
use std::fmt;

/// Client for the external article API (`/articles` index, create and update).
pub struct HttpArticleStore {
    client: Client,
    base_url: String,
}

impl fmt::Debug for HttpArticleStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpArticleStore")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HttpArticleStore {
    /// `base_url` is the collection endpoint, e.g. `http://127.0.0.1:8000/api/articles`.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::Config("Article API url must not be empty".to_string()));
        }
        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn article_url(&self, id: i64) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

#[async_trait]
impl ArticleStore for HttpArticleStore {
    async fn list_articles(&self) -> Result<Vec<StoredArticle>> {
        let response = self
            .client
            .get(&self.base_url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::SourceUnavailable(format!("{}: {}", self.base_url, e)))?;

        if !response.status().is_success() {
            return Err(Error::SourceUnavailable(format!(
                "{} returned {}",
                self.base_url,
                response.status()
            )));
        }

        response
            .json::<Vec<StoredArticle>>()
            .await
            .map_err(|e| Error::SourceUnavailable(format!("Malformed article list: {}", e)))
    }

    // The API has no lookup endpoint, so this filters the index.
    async fn find_by_url(&self, url: &str) -> Result<Option<StoredArticle>> {
        let articles = self.list_articles().await?;
        Ok(articles.into_iter().find(|a| a.record.url == url))
    }

    async fn create_article(&self, record: &ArticleRecord) -> Result<StoredArticle> {
        let response = self
            .client
            .post(&self.base_url)
            .header("Accept", "application/json")
            .json(record)
            .send()
            .await
            .map_err(|e| Error::Persist(format!("{}: {}", self.base_url, e)))?;

        match response.status() {
            StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                Err(Error::Conflict(record.url.clone()))
            }
            status if status.is_success() => response
                .json::<StoredArticle>()
                .await
                .map_err(|e| Error::Persist(format!("Malformed create response: {}", e))),
            status => Err(Error::Persist(format!(
                "Create of {} returned {}",
                record.url, status
            ))),
        }
    }

    async fn update_article(&self, id: i64, update: ArticleUpdate) -> Result<StoredArticle> {
        let url = self.article_url(id);
        let response = self
            .client
            .put(&url)
            .header("Accept", "application/json")
            .json(&update)
            .send()
            .await
            .map_err(|e| Error::Persist(format!("{}: {}", url, e)))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(Error::NotFound(id)),
            status if status.is_success() => response
                .json::<StoredArticle>()
                .await
                .map_err(|e| Error::Persist(format!("Malformed update response: {}", e))),
            status => Err(Error::Persist(format!("Update of article {} returned {}", id, status))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStorage;
    use axum::extract::{Path, State};
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::{get, put};
    use axum::{Json, Router};
    use std::sync::Arc;

    type Shared = State<Arc<MemoryStorage>>;

    async fn index(State(store): Shared) -> Json<Vec<StoredArticle>> {
        Json(store.list_articles().await.unwrap())
    }

    async fn create(
        State(store): Shared,
        Json(record): Json<ArticleRecord>,
    ) -> std::result::Result<Json<StoredArticle>, AxumStatus> {
        store
            .create_article(&record)
            .await
            .map(Json)
            .map_err(|_| AxumStatus::CONFLICT)
    }

    async fn update(
        State(store): Shared,
        Path(id): Path<i64>,
        Json(update): Json<ArticleUpdate>,
    ) -> std::result::Result<Json<StoredArticle>, AxumStatus> {
        store
            .update_article(id, update)
            .await
            .map(Json)
            .map_err(|_| AxumStatus::NOT_FOUND)
    }

    async fn serve(store: Arc<MemoryStorage>) -> String {
        let app = Router::new()
            .route("/api/articles", get(index).post(create))
            .route("/api/articles/:id", put(update))
            .with_state(store);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api/articles", addr)
    }

    fn record(url: &str) -> ArticleRecord {
        ArticleRecord {
            url: url.to_string(),
            title: "Remote".to_string(),
            description: String::new(),
            image_url: Some("http://example.com/cover.png".to_string()),
            author: "Jane".to_string(),
            content: "<p>original</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_round_trip_through_api() {
        let backing = Arc::new(MemoryStorage::new());
        let store = HttpArticleStore::new(&serve(backing.clone()).await).unwrap();

        let created = store.create_article(&record("http://example.com/a")).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(backing.len().await, 1);

        let found = store.find_by_url("http://example.com/a").await.unwrap().unwrap();
        assert_eq!(found.record.image_url.as_deref(), Some("http://example.com/cover.png"));
        assert!(store.find_by_url("http://example.com/zzz").await.unwrap().is_none());

        let updated = store
            .update_article(created.id, ArticleUpdate::content("<div>new</div>"))
            .await
            .unwrap();
        assert_eq!(updated.record.content, "<div>new</div>");
        assert_eq!(updated.record.title, "Remote");
    }

    #[tokio::test]
    async fn test_status_codes_map_to_errors() {
        let store = HttpArticleStore::new(&serve(Arc::new(MemoryStorage::new())).await).unwrap();

        store.create_article(&record("http://example.com/a")).await.unwrap();
        let duplicate = store.create_article(&record("http://example.com/a")).await;
        assert!(matches!(duplicate, Err(Error::Conflict(_))));

        let missing = store.update_article(99, ArticleUpdate::content("x")).await;
        assert!(matches!(missing, Err(Error::NotFound(99))));
    }

    #[tokio::test]
    async fn test_unreachable_api_is_source_unavailable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let store = HttpArticleStore::new(&format!("http://{}/api/articles", addr)).unwrap();
        let result = store.list_articles().await;
        assert!(matches!(result, Err(Error::SourceUnavailable(_))));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let store = HttpArticleStore::new("http://localhost:8000/api/articles/").unwrap();
        assert_eq!(store.base_url(), "http://localhost:8000/api/articles");
        assert_eq!(store.article_url(4), "http://localhost:8000/api/articles/4");
        assert!(HttpArticleStore::new("/").is_err());
    }
}
