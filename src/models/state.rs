use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::SourceLookup;

/// Errors raised when building or merging pipeline state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("sentence must not be empty")]
    EmptySentence,

    #[error("field `{field}` is required but has not been set")]
    MissingField { field: &'static str },

    #[error("field `{field}` is already set and cannot be overwritten")]
    FieldOverwrite { field: &'static str },
}

/// State record threaded through the citation pipeline
///
/// Only `sentence` exists at entry. Every other field is filled by exactly
/// one stage and never revised afterwards. Deserialized records go through
/// the same sentence check as [`CitationState::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StateRecord")]
pub struct CitationState {
    sentence: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<SourceLookup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    enhanced: Option<String>,
}

/// Wire shape of a state record before validation
#[derive(Deserialize)]
struct StateRecord {
    sentence: String,
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    source: Option<SourceLookup>,
    #[serde(default)]
    enhanced: Option<String>,
}

impl TryFrom<StateRecord> for CitationState {
    type Error = StateError;

    fn try_from(record: StateRecord) -> Result<Self, Self::Error> {
        let mut state = Self::new(record.sentence)?;
        state.query = record.query;
        state.source = record.source;
        state.enhanced = record.enhanced;
        Ok(state)
    }
}

/// Partial update returned by a stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateUpdate {
    /// Echo of the input sentence (must match the current value)
    pub sentence: Option<String>,
    pub query: Option<String>,
    pub source: Option<SourceLookup>,
    pub enhanced: Option<String>,
}

/// Inputs for the rewrite directive, with anything missing rendered empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptFields<'a> {
    pub sentence: &'a str,
    pub quote: &'a str,
    pub source_title: &'a str,
    pub source_url: &'a str,
}

impl CitationState {
    pub fn new(sentence: impl Into<String>) -> Result<Self, StateError> {
        let sentence = sentence.into();
        if sentence.trim().is_empty() {
            return Err(StateError::EmptySentence);
        }

        Ok(Self {
            sentence,
            query: None,
            source: None,
            enhanced: None,
        })
    }

    /// Re-check the entry invariant on a state built elsewhere
    pub fn validate(&self) -> Result<(), StateError> {
        if self.sentence.trim().is_empty() {
            return Err(StateError::EmptySentence);
        }
        Ok(())
    }

    pub fn sentence(&self) -> &str {
        &self.sentence
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn source(&self) -> Option<&SourceLookup> {
        self.source.as_ref()
    }

    pub fn enhanced(&self) -> Option<&str> {
        self.enhanced.as_deref()
    }

    /// Source title with failure markers applied; `None` until retrieval has run
    pub fn source_title(&self) -> Option<&str> {
        self.source.as_ref().map(SourceLookup::display_title)
    }

    pub fn source_url(&self) -> Option<&str> {
        self.source.as_ref().map(SourceLookup::url)
    }

    pub fn quote(&self) -> Option<&str> {
        self.source.as_ref().map(SourceLookup::quote)
    }

    /// Fields for the rewrite directive. Failed or empty lookups yield empty strings
    /// so the completion service is told to omit citation material.
    pub fn prompt_fields(&self) -> PromptFields<'_> {
        let found = self.source.as_ref().and_then(SourceLookup::source);
        PromptFields {
            sentence: &self.sentence,
            quote: found.map(|s| s.quote.as_str()).unwrap_or(""),
            source_title: found.map(|s| s.title.as_str()).unwrap_or(""),
            source_url: found.map(|s| s.url.as_str()).unwrap_or(""),
        }
    }

    /// Merge a stage's update into a new state.
    ///
    /// Echoed values equal to the current ones are accepted; a differing value
    /// for a field that is already set is rejected.
    pub fn merge(self, update: StateUpdate) -> Result<Self, StateError> {
        if let Some(sentence) = update.sentence {
            if sentence != self.sentence {
                return Err(StateError::FieldOverwrite { field: "sentence" });
            }
        }

        Ok(Self {
            query: merge_field("query", self.query, update.query)?,
            source: merge_field("source", self.source, update.source)?,
            enhanced: merge_field("enhanced", self.enhanced, update.enhanced)?,
            sentence: self.sentence,
        })
    }
}

fn merge_field<T: PartialEq>(
    field: &'static str,
    current: Option<T>,
    incoming: Option<T>,
) -> Result<Option<T>, StateError> {
    match (current, incoming) {
        (Some(current), Some(incoming)) if current != incoming => {
            Err(StateError::FieldOverwrite { field })
        }
        (Some(current), _) => Ok(Some(current)),
        (None, incoming) => Ok(incoming),
    }
}

impl StateUpdate {
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_source(mut self, source: SourceLookup) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_enhanced(mut self, enhanced: impl Into<String>) -> Self {
        self.enhanced = Some(enhanced.into());
        self
    }

    /// Echo the state's sentence (and query, if set) back as pass-through values
    pub fn echoing(state: &CitationState) -> Self {
        Self {
            sentence: Some(state.sentence.clone()),
            query: state.query.clone(),
            ..Default::default()
        }
    }
}
