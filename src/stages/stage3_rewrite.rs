use anyhow::Result;
use tracing::{info, warn};

use crate::llm::{
    build_rewrite_prompt, check_rewrite, CompletionService, ValidationConfig, REWRITE_RUN_NAME,
};
use crate::models::{CitationState, StateError, StateUpdate};

/// Configuration for Stage 3
#[derive(Debug, Clone)]
pub struct RewriteConfig {
    /// Run label passed to the completion service
    pub run_name: String,
    /// Post-condition checks on the rewrite
    pub validation: ValidationConfig,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            run_name: REWRITE_RUN_NAME.to_string(),
            validation: ValidationConfig::default(),
        }
    }
}

/// Execute Stage 3: citation rewrite
///
/// Requires retrieval to have run; an empty lookup is fine, an absent one is not.
///
/// 1. Build the rewrite directive from the sentence and whatever the retrieval found
/// 2. Call the completion service once
/// 3. Reject an empty rewrite, log advisory warnings for the rest
pub async fn execute_rewrite_stage<C: CompletionService + ?Sized>(
    client: &C,
    state: &CitationState,
    config: &RewriteConfig,
) -> Result<StateUpdate> {
    if state.source().is_none() {
        return Err(StateError::MissingField { field: "source" }.into());
    }

    let fields = state.prompt_fields();
    let prompt = build_rewrite_prompt(&fields);

    let enhanced = client.complete(&prompt, Some(&config.run_name)).await?;

    let check = check_rewrite(
        fields.sentence,
        &enhanced,
        fields.source_url,
        &config.validation,
    );
    if !check.is_valid {
        anyhow::bail!("Rewrite failed validation: {:?}", check.errors);
    }
    for warning in &check.warnings {
        warn!("Stage 3: {}", warning);
    }

    info!(
        "Stage 3: rewrite has {} sentence(s) for {} in input",
        check.output_sentences, check.input_sentences
    );

    Ok(StateUpdate::default().with_enhanced(enhanced))
}
