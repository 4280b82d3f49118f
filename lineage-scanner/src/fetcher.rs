use crate::error::{Result, ScanError};
use crate::record::Identifier;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.findagrave.com/memorial/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

// The site serves a reduced page to unknown agents.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; WOW64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Source of raw memorial pages.
///
/// Implementations return [`ScanError::NotFound`] when the record does not
/// exist and any other variant when retrieval itself failed.
#[async_trait]
pub trait RecordFetcher: Send + Sync {
    async fn fetch(&self, id: &Identifier) -> Result<String>;
}

pub struct HttpFetcher {
    client: Client,
    base_url: Url,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs((timeout_secs / 2).max(1)))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            base_url: parse_base_url(DEFAULT_BASE_URL)?,
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Page address for a record: the base URL with the id appended.
    pub fn record_url(&self, id: &Identifier) -> Result<Url> {
        self.base_url
            .join(id.as_str())
            .map_err(|e| ScanError::InvalidUrl(format!("{}{}: {}", self.base_url, id, e)))
    }
}

#[async_trait]
impl RecordFetcher for HttpFetcher {
    async fn fetch(&self, id: &Identifier) -> Result<String> {
        let url = self.record_url(id)?;
        debug!("Fetching {}", url);

        let start = Instant::now();
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            debug!("{} answered {} after {:?}", url, status, start.elapsed());
            return Err(ScanError::NotFound(id.clone()));
        }
        if !status.is_success() {
            return Err(ScanError::HttpStatus {
                id: id.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        debug!(
            "Fetched {} ({} bytes) in {:?}",
            url,
            body.len(),
            start.elapsed()
        );
        Ok(body)
    }
}

// A base without a trailing slash would have its last segment replaced by
// `Url::join`, so one is always added.
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }

    let url = Url::parse(&normalized)
        .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", raw, e)))?;
    if url.cannot_be_a_base() {
        return Err(ScanError::InvalidUrl(format!("{} cannot be used as a base", raw)));
    }
    Ok(url)
}
