use anyhow::Result;
use tracing::{info, warn};

use crate::models::{
    CitationState, Freshness, SourceLookup, StateError, StateUpdate, WebSearchRequest,
};
use crate::search::{SearchReply, SearchService};

/// Configuration for Stage 2
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Number of results requested (only the first is used)
    pub count: u32,
    /// Recency filter
    pub freshness: Freshness,
    /// Ask the service for a long-form summary as a snippet fallback
    pub summary: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            count: 1,
            freshness: Freshness::NoLimit,
            summary: true,
        }
    }
}

/// Execute Stage 2: source retrieval
///
/// Issues one search and keeps the top-ranked page only. A non-success status
/// or an empty result set becomes a recorded lookup outcome so the pipeline
/// continues; transport failures propagate.
pub async fn execute_search_stage<S: SearchService + ?Sized>(
    client: &S,
    state: &CitationState,
    config: &SearchConfig,
) -> Result<StateUpdate> {
    let query = state
        .query()
        .ok_or(StateError::MissingField { field: "query" })?;

    let request = WebSearchRequest {
        query: query.to_string(),
        freshness: config.freshness,
        summary: config.summary,
        count: config.count,
    };

    let reply = client.web_search(&request).await?;
    let lookup = lookup_from_reply(reply);

    match &lookup {
        SourceLookup::Found(source) => {
            info!("Stage 2: found {:?} ({})", source.title, source.url)
        }
        SourceLookup::NotFound => info!("Stage 2: no sources found"),
        SourceLookup::ServiceError { status } => {
            warn!("Stage 2: search service returned status {}", status)
        }
    }

    Ok(StateUpdate::echoing(state).with_source(lookup))
}

/// Shape a search reply into a lookup outcome
pub fn lookup_from_reply(reply: SearchReply) -> SourceLookup {
    match reply {
        SearchReply::Failed { status, body } => {
            warn!("Search failed with status {}: {}", status, body);
            SourceLookup::ServiceError { status }
        }
        SearchReply::Success(response) => match response.first_page() {
            Some(page) => SourceLookup::found(page.name.clone(), page.url.clone(), page.excerpt()),
            None => SourceLookup::NotFound,
        },
    }
}
