use bp_core::{ArticleStore, Error, Result};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub mod backends;

pub use backends::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Memory,
    Sqlite,
    Http,
}

impl FromStr for StorageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            "http" => Ok(Self::Http),
            other => Err(Error::Config(format!(
                "Unknown storage backend '{}'. Available: memory, sqlite, http",
                other
            ))),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Memory => "memory",
            Self::Sqlite => "sqlite",
            Self::Http => "http",
        };
        f.write_str(name)
    }
}

/// Builds the selected store. `location` is the database path for sqlite and
/// the API base url for http; memory ignores it.
pub async fn create_storage(kind: StorageKind, location: Option<&str>) -> Result<Arc<dyn ArticleStore>> {
    match kind {
        StorageKind::Memory => Ok(Arc::new(MemoryStorage::new())),
        StorageKind::Http => {
            let base_url = location.ok_or_else(|| {
                Error::Config("The http backend needs the article API url".to_string())
            })?;
            Ok(Arc::new(HttpArticleStore::new(base_url)?))
        }
        #[cfg(feature = "sqlite")]
        StorageKind::Sqlite => {
            let path = std::path::PathBuf::from(location.unwrap_or(sqlite::DEFAULT_DB_PATH));
            Ok(Arc::new(SQLiteStorage::new_with_path(&path).await?))
        }
        #[cfg(not(feature = "sqlite"))]
        StorageKind::Sqlite => Err(Error::Config(
            "SQLite support is not compiled in (enable the `sqlite` feature)".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_kind_parsing() {
        assert_eq!("memory".parse::<StorageKind>().unwrap(), StorageKind::Memory);
        assert_eq!("HTTP".parse::<StorageKind>().unwrap(), StorageKind::Http);
        assert!("redis".parse::<StorageKind>().is_err());
        assert_eq!(StorageKind::Sqlite.to_string(), "sqlite");
    }

    #[tokio::test]
    async fn test_http_backend_requires_url() {
        let result = create_storage(StorageKind::Http, None).await;
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_create_memory_storage() {
        let storage = create_storage(StorageKind::Memory, None).await.unwrap();
        assert!(storage.list_articles().await.unwrap().is_empty());
    }
}
