use crate::config::Config;
use crate::error::FetchError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;
use tracing::{debug, error};

/// A downloaded page body
#[derive(Debug, Clone)]
pub struct Page {
    pub url: String,
    pub body: String,
}

impl Page {
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
        }
    }

    /// Parse the body into a traversable document
    pub fn document(&self) -> Html {
        Html::parse_document(&self.body)
    }
}

/// Anything that can hand back page bodies by URL
#[async_trait]
pub trait PageSource: Send + Sync {
    /// `None` means the page could not be retrieved and should be skipped.
    async fn fetch(&self, url: &str) -> Option<Page>;
}

/// Plain GET fetcher with static headers
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn try_fetch(&self, url: &str) -> Result<Page, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(transport)?;
        debug!("Downloaded {} bytes from {}", body.len(), url);

        Ok(Page::new(url, body))
    }
}

#[async_trait]
impl PageSource for HttpFetcher {
    async fn fetch(&self, url: &str) -> Option<Page> {
        match self.try_fetch(url).await {
            Ok(page) => Some(page),
            Err(e) => {
                error!("Request error: {}", e);
                None
            }
        }
    }
}
