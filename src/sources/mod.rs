//! Fetchers for the two paper sources: the arXiv query API and the JMLR feed.

use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use serde::Serialize;

use crate::error::{AppError, Result};

pub mod arxiv;
pub mod jmlr;

pub use arxiv::ArxivClient;
pub use jmlr::JmlrClient;

/// One paper as a source reports it. `summary` is the raw abstract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaperRecord {
    pub title: String,
    pub summary: String,
    pub link: String,
}

pub const FEED_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client with connection pooling and the given overall request timeout.
pub fn http_client(timeout: Duration) -> Result<Client> {
    ClientBuilder::new()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(5))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))
}

/// GETs `url` and returns the body, treating non-2xx answers as fetch errors.
pub(crate) async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.text().await?)
}
