use async_trait::async_trait;
use bp_core::{Error, Result};
use reqwest::Client;
use std::fmt;

const USER_AGENT: &str = concat!("Mozilla/5.0 (compatible; blogpipe/", env!("CARGO_PKG_VERSION"), ")");

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the body of `url`; any non-success response is an `Error::Fetch`.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Plain HTTP GET. Retries and timeouts are left to whoever schedules the run.
pub struct HttpFetcher {
    client: Client,
}

impl fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("client", &"<reqwest::Client>")
            .finish()
    }
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::fetch(url, format!("status {}", status)));
        }

        response.text().await.map_err(|e| Error::fetch(url, e))
    }
}
