use serde::{Deserialize, Serialize};

/// Recency filter accepted by the LangSearch web-search API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Freshness {
    OneDay,
    OneWeek,
    OneMonth,
    OneYear,
    /// No recency restriction
    #[default]
    NoLimit,
}

impl std::str::FromStr for Freshness {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "oneDay" | "day" => Ok(Self::OneDay),
            "oneWeek" | "week" => Ok(Self::OneWeek),
            "oneMonth" | "month" => Ok(Self::OneMonth),
            "oneYear" | "year" => Ok(Self::OneYear),
            "noLimit" | "none" => Ok(Self::NoLimit),
            other => anyhow::bail!("Unknown freshness filter: {}", other),
        }
    }
}

/// Request body for the LangSearch web-search API
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebSearchRequest {
    /// Search query text
    pub query: String,
    /// Recency filter
    pub freshness: Freshness,
    /// Whether to ask for a long-form summary alongside the snippet
    pub summary: bool,
    /// Number of results requested
    pub count: u32,
}

/// Root response from the LangSearch web-search API
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WebSearchResponse {
    #[serde(default)]
    pub data: WebSearchData,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WebSearchData {
    #[serde(default, rename = "webPages")]
    pub web_pages: WebPages,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WebPages {
    #[serde(default)]
    pub value: Vec<WebPage>,
}

/// A single ranked page result
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WebPage {
    /// Display name of the page
    #[serde(default)]
    pub name: String,
    /// Canonical URL
    #[serde(default)]
    pub url: String,
    /// Short excerpt around the match
    #[serde(default)]
    pub snippet: Option<String>,
    /// Longer summary (only when `summary: true` was requested)
    #[serde(default)]
    pub summary: Option<String>,
}

impl WebSearchResponse {
    /// Ranked pages, best first
    pub fn pages(&self) -> &[WebPage] {
        &self.data.web_pages.value
    }

    /// The top-ranked page, if any
    pub fn first_page(&self) -> Option<&WebPage> {
        self.pages().first()
    }
}

impl WebPage {
    /// Supporting excerpt: the snippet, or the summary when the snippet is absent or empty
    pub fn excerpt(&self) -> &str {
        self.snippet
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.summary.as_deref())
            .unwrap_or("")
    }
}
