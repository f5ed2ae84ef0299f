use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Why a page could not be retrieved
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to retrieve content. Status code: {0}")]
    Status(u16),

    #[error("An error occurred: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Plain GET of a full HTML page
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("Failed to create fetch HTTP client")?;

        Ok(Self { client })
    }

    /// Fetch `url` and return its body. Only a 200 counts as success.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        info!("Scraping from {}...", url);

        let result = self.get_body(url).await;
        match &result {
            Ok(body) => debug!("Fetched {} bytes from {}", body.len(), url),
            Err(e @ FetchError::Status(_)) => warn!("{}", e),
            Err(e @ FetchError::Transport(_)) => error!("{}", e),
        }

        result
    }

    async fn get_body(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}
