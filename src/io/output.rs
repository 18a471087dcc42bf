use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::CitationState;

/// Flat, machine-readable view of a finished (or partial) pipeline state
///
/// Failed lookups are rendered with their display markers here and nowhere else.
#[derive(Debug, Clone, Serialize)]
pub struct CitationReport {
    pub sentence: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enhanced: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<Uuid>,
    pub generated_at: DateTime<Utc>,
}

impl CitationReport {
    pub fn from_state(state: &CitationState, run_id: Option<Uuid>) -> Self {
        Self {
            sentence: state.sentence().to_string(),
            query: state.query().map(str::to_string),
            source_title: state.source_title().map(str::to_string),
            source_url: state.source_url().map(str::to_string),
            quote: state.quote().map(str::to_string),
            enhanced: state.enhanced().map(str::to_string),
            run_id,
            generated_at: Utc::now(),
        }
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }

    /// Human-readable text: the rewrite, or a placeholder when none was produced
    pub fn format_text(&self) -> String {
        match &self.enhanced {
            Some(enhanced) => enhanced.clone(),
            None => "No output".to_string(),
        }
    }

    /// Summary of the retrieval step, for the `search` command
    pub fn format_source(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("Query:  {}\n", self.query.as_deref().unwrap_or("")));
        output.push_str(&format!(
            "Source: {}\n",
            self.source_title.as_deref().unwrap_or("")
        ));
        if let Some(url) = self.source_url.as_deref().filter(|u| !u.is_empty()) {
            output.push_str(&format!("URL:    {}\n", url));
        }
        if let Some(quote) = self.quote.as_deref().filter(|q| !q.is_empty()) {
            output.push_str(&format!("Quote:  \"{}\"\n", quote));
        }
        output
    }
}
