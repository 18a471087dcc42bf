use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::models::{WebSearchRequest, WebSearchResponse};

/// Default LangSearch web-search endpoint
pub const DEFAULT_LANGSEARCH_ENDPOINT: &str = "https://api.langsearch.com/v1/web-search";

/// Reply from a search service
///
/// A non-success status is an application-level answer, not a transport error,
/// so it is returned rather than raised.
#[derive(Debug, Clone)]
pub enum SearchReply {
    Success(WebSearchResponse),
    Failed { status: u16, body: String },
}

/// A web-search service: query in, ranked pages out
#[async_trait]
pub trait SearchService: Send + Sync {
    async fn web_search(&self, request: &WebSearchRequest) -> Result<SearchReply>;
}

/// Configuration for the LangSearch client
#[derive(Debug, Clone)]
pub struct LangSearchConfig {
    /// API key (from LANGSEARCH_API_KEY env var)
    pub api_key: String,
    /// Web-search endpoint URL
    pub endpoint: String,
}

impl LangSearchConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("LANGSEARCH_API_KEY")
            .context("LANGSEARCH_API_KEY environment variable not set")?;
        let endpoint = std::env::var("LANGSEARCH_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_LANGSEARCH_ENDPOINT.to_string());

        Ok(Self { api_key, endpoint })
    }

    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            endpoint: DEFAULT_LANGSEARCH_ENDPOINT.to_string(),
        }
    }
}

/// LangSearch web-search API client
pub struct LangSearchClient {
    client: Client,
    config: LangSearchConfig,
}

impl LangSearchClient {
    pub fn new(config: LangSearchConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl SearchService for LangSearchClient {
    async fn web_search(&self, request: &WebSearchRequest) -> Result<SearchReply> {
        debug!("LangSearch query: {:?} (count={})", request.query, request.count);

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .context("Failed to send request to LangSearch API")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Ok(SearchReply::Failed {
                status: status.as_u16(),
                body,
            });
        }

        let response: WebSearchResponse = response
            .json()
            .await
            .context("Failed to parse LangSearch API response")?;

        debug!("LangSearch returned {} pages", response.pages().len());
        Ok(SearchReply::Success(response))
    }
}
