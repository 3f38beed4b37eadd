use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Article source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Persist error: {0}")]
    Persist(String),

    #[error("Article not found: {0}")]
    NotFound(i64),

    #[error("Article already exists: {0}")]
    Conflict(String),

    #[error("Invalid selector: {0}")]
    Selector(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::fetch("https://example.com/blogs/", "status 503");
        assert_eq!(
            err.to_string(),
            "Failed to fetch https://example.com/blogs/: status 503"
        );
        assert_eq!(Error::NotFound(7).to_string(), "Article not found: 7");
    }
}
