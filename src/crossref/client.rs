//! Crossref REST client
//!
//! Thin `reqwest` wrapper. Every non-2xx status, transport failure and
//! undecodable body is surfaced as [`AppError::Remote`]; no retries.

use super::{Envelope, RawReference, WorkDetail, WorkItem, WorkList, WorkSource};
use crate::config::{CrossrefConfig, DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECS};
use crate::types::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

/// Fields requested from the search endpoint
const SEARCH_SELECT: &str = "DOI,title,author,published-print,container-title";

const USER_AGENT: &str = concat!("reftree/", env!("CARGO_PKG_VERSION"));

pub struct CrossrefClient {
    client: Client,
    api_base: String,
    mailto: Option<String>,
    timeout: Duration,
}

impl CrossrefClient {
    /// Create a client against the given API base (no trailing slash needed)
    pub fn new(api_base: &str) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            mailto: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn from_config(config: &CrossrefConfig) -> Self {
        let client = Self::new(&config.api_base)
            .with_timeout(Duration::from_secs(config.timeout_secs));
        match &config.mailto {
            Some(mailto) => client.with_mailto(mailto),
            None => client,
        }
    }

    pub fn with_mailto(mut self, mailto: &str) -> Self {
        self.mailto = Some(mailto.to_string());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn works_url(&self) -> AppResult<Url> {
        Url::parse(&format!("{}/works", self.api_base))
            .map_err(|e| AppError::Remote(format!("Invalid Crossref base URL: {}", e)))
    }

    /// `/works/{doi}` with the DOI percent-encoded as one path segment
    fn work_url(&self, doi: &str) -> AppResult<Url> {
        let mut url = self.works_url()?;
        url.path_segments_mut()
            .map_err(|_| AppError::Remote("Crossref base URL cannot carry a path".to_string()))?
            .push(doi);
        Ok(url)
    }

    fn get(&self, url: Url) -> RequestBuilder {
        let request = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .timeout(self.timeout);
        match &self.mailto {
            Some(mailto) => request.query(&[("mailto", mailto.as_str())]),
            None => request,
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> AppResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::Remote(format!("Crossref {} request failed: {}", what, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(200).collect();
            return Err(AppError::Remote(format!(
                "Crossref {} returned {}: {}",
                what, status, snippet
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Remote(format!("Failed to parse Crossref {} response: {}", what, e)))
    }
}

impl Default for CrossrefClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

#[async_trait]
impl WorkSource for CrossrefClient {
    async fn search_works(&self, query: &str, rows: usize) -> AppResult<Vec<WorkItem>> {
        info!(query = %query, rows, "Searching Crossref works");

        let rows = rows.to_string();
        let request = self.get(self.works_url()?).query(&[
            ("query", query),
            ("rows", rows.as_str()),
            ("select", SEARCH_SELECT),
        ]);

        let envelope: Envelope<WorkList> = self.send_json(request, "search").await?;
        let items = envelope.message.items;

        info!(count = items.len(), "Crossref search completed");
        Ok(items)
    }

    async fn fetch_references(&self, doi: &str) -> AppResult<Vec<RawReference>> {
        debug!(doi = %doi, "Fetching references from Crossref");

        let request = self.get(self.work_url(doi)?);
        let envelope: Envelope<WorkDetail> = self.send_json(request, "lookup").await?;
        let references = envelope.message.reference;

        debug!(doi = %doi, count = references.len(), "Crossref lookup completed");
        Ok(references)
    }
}
