use serde::{Deserialize, Serialize};

/// Display marker used when the search service answered with a non-success status
pub const SEARCH_ERROR_TITLE: &str = "LangSearch API error";

/// Display marker used when the search succeeded but returned no pages
pub const NO_SOURCES_TITLE: &str = "No sources found.";

/// A candidate source with its supporting excerpt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Display name of the page
    pub title: String,
    /// Canonical URL
    pub url: String,
    /// Supporting excerpt (may be empty)
    pub quote: String,
}

/// Outcome of the source retrieval stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SourceLookup {
    /// The top-ranked page
    Found(Source),
    /// The search succeeded with zero results
    NotFound,
    /// The search service answered with a non-success HTTP status
    ServiceError { status: u16 },
}

impl SourceLookup {
    pub fn found(title: impl Into<String>, url: impl Into<String>, quote: impl Into<String>) -> Self {
        Self::Found(Source {
            title: title.into(),
            url: url.into(),
            quote: quote.into(),
        })
    }

    pub fn source(&self) -> Option<&Source> {
        match self {
            Self::Found(source) => Some(source),
            _ => None,
        }
    }

    /// Title as shown to readers, with the failure markers substituted
    pub fn display_title(&self) -> &str {
        match self {
            Self::Found(source) => &source.title,
            Self::NotFound => NO_SOURCES_TITLE,
            Self::ServiceError { .. } => SEARCH_ERROR_TITLE,
        }
    }

    pub fn url(&self) -> &str {
        self.source().map(|s| s.url.as_str()).unwrap_or("")
    }

    pub fn quote(&self) -> &str {
        self.source().map(|s| s.quote.as_str()).unwrap_or("")
    }
}
