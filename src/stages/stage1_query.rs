use anyhow::Result;
use tracing::info;

use crate::llm::{build_query_prompt, CompletionService, QUERY_RUN_NAME};
use crate::models::{CitationState, StateUpdate};

/// Configuration for Stage 1
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Run label passed to the completion service
    pub run_name: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            run_name: QUERY_RUN_NAME.to_string(),
        }
    }
}

/// Execute Stage 1: query formulation
///
/// One completion call; the returned text is used as the query exactly as
/// given. Completion failures propagate and stop the pipeline.
pub async fn execute_query_stage<C: CompletionService + ?Sized>(
    client: &C,
    state: &CitationState,
    config: &QueryConfig,
) -> Result<StateUpdate> {
    let prompt = build_query_prompt(state.sentence());
    let query = client.complete(&prompt, Some(&config.run_name)).await?;

    info!("Stage 1: query {:?}", query);

    Ok(StateUpdate::echoing(state).with_query(query))
}
