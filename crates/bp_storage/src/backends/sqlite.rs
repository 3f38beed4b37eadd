use async_trait::async_trait;
use bp_core::{ArticleRecord, ArticleStore, ArticleUpdate, Error, Result, StoredArticle};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::Row;
use std::path::Path;
use std::sync::Arc;

pub const DEFAULT_DB_PATH: &str = "articles.db";

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        url TEXT NOT NULL UNIQUE,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        image_url TEXT,
        author TEXT NOT NULL,
        content TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    // Add future migrations here
];

const SELECT_COLUMNS: &str =
    "SELECT id, url, title, description, image_url, author, content, created_at, updated_at FROM articles";

pub struct SQLiteStorage {
    pool: Arc<SqlitePool>,
}

impl SQLiteStorage {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| Error::Persist(format!("Failed to connect to database: {}", e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Persist(format!("Failed to run migration {}: {}", i, e)))?;
        }

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<StoredArticle>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| Error::SourceUnavailable(format!("Failed to load article {}: {}", id, e)))?;
        row.as_ref().map(row_to_article).transpose()
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| Error::Persist(format!("Failed to parse date '{}': {}", value, e)))
}

fn row_to_article(row: &SqliteRow) -> Result<StoredArticle> {
    let column = |e: sqlx::Error| Error::Persist(format!("Malformed article row: {}", e));
    let created_at: String = row.try_get("created_at").map_err(column)?;
    let updated_at: String = row.try_get("updated_at").map_err(column)?;

    Ok(StoredArticle {
        id: row.try_get("id").map_err(column)?,
        record: ArticleRecord {
            url: row.try_get("url").map_err(column)?,
            title: row.try_get("title").map_err(column)?,
            description: row.try_get("description").map_err(column)?,
            image_url: row.try_get("image_url").map_err(column)?,
            author: row.try_get("author").map_err(column)?,
            content: row.try_get("content").map_err(column)?,
        },
        created_at: Some(parse_timestamp(&created_at)?),
        updated_at: Some(parse_timestamp(&updated_at)?),
    })
}

#[async_trait]
impl ArticleStore for SQLiteStorage {
    async fn list_articles(&self) -> Result<Vec<StoredArticle>> {
        let rows = sqlx::query(&format!("{} ORDER BY created_at DESC, id DESC", SELECT_COLUMNS))
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| Error::SourceUnavailable(format!("Failed to list articles: {}", e)))?;

        rows.iter().map(row_to_article).collect()
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<StoredArticle>> {
        let row = sqlx::query(&format!("{} WHERE url = ?", SELECT_COLUMNS))
            .bind(url)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| Error::SourceUnavailable(format!("Failed to look up {}: {}", url, e)))?;

        row.as_ref().map(row_to_article).transpose()
    }

    async fn create_article(&self, record: &ArticleRecord) -> Result<StoredArticle> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO articles
            (url, title, description, image_url, author, content, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.url)
        .bind(&record.title)
        .bind(&record.description)
        .bind(record.image_url.as_deref())
        .bind(&record.author)
        .bind(&record.content)
        .bind(timestamp(now))
        .bind(timestamp(now))
        .execute(&*self.pool)
        .await;

        match result {
            Ok(done) => Ok(StoredArticle {
                id: done.last_insert_rowid(),
                record: record.clone(),
                created_at: Some(now),
                updated_at: Some(now),
            }),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(Error::Conflict(record.url.clone()))
            }
            Err(e) => Err(Error::Persist(format!("Failed to store article: {}", e))),
        }
    }

    async fn update_article(&self, id: i64, update: ArticleUpdate) -> Result<StoredArticle> {
        let done = sqlx::query(
            r#"
            UPDATE articles SET
                title = COALESCE(?, title),
                description = COALESCE(?, description),
                image_url = COALESCE(?, image_url),
                author = COALESCE(?, author),
                content = COALESCE(?, content),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(update.title)
        .bind(update.description)
        .bind(update.image_url)
        .bind(update.author)
        .bind(update.content)
        .bind(timestamp(Utc::now()))
        .bind(id)
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Persist(format!("Failed to update article {}: {}", id, e)))?;

        if done.rows_affected() == 0 {
            return Err(Error::NotFound(id));
        }
        self.get_by_id(id).await?.ok_or(Error::NotFound(id))
    }
}
