use anyhow::Result;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::llm::CompletionService;
use crate::models::CitationState;
use crate::search::SearchService;
use crate::stages::{
    execute_query_stage, execute_rewrite_stage, execute_search_stage, QueryConfig, RewriteConfig,
    SearchConfig,
};

/// Configuration for all three stages
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub query: QueryConfig,
    pub search: SearchConfig,
    pub rewrite: RewriteConfig,
}

/// Result of a pipeline invocation
#[derive(Debug, Clone)]
pub struct PipelineRun {
    /// Identifier attached to this invocation's log span
    pub run_id: Uuid,
    /// Fully merged state
    pub state: CitationState,
}

/// The citation pipeline: query formulation → source retrieval → rewrite
///
/// Stages run strictly in order. Each one reads the accumulated state and
/// returns an update that is merged into a fresh copy. The pipeline holds no
/// per-invocation state, so concurrent invocations only need their own records.
pub struct CitationPipeline<C, S> {
    completion: C,
    search: S,
    config: PipelineConfig,
}

impl<C: CompletionService, S: SearchService> CitationPipeline<C, S> {
    pub fn new(completion: C, search: S) -> Self {
        Self::with_config(completion, search, PipelineConfig::default())
    }

    pub fn with_config(completion: C, search: S, config: PipelineConfig) -> Self {
        Self {
            completion,
            search,
            config,
        }
    }

    /// Run the pipeline for a single claim
    pub async fn run(&self, sentence: &str) -> Result<PipelineRun> {
        let state = CitationState::new(sentence)?;
        self.invoke(state).await
    }

    /// Run the pipeline on an entry state
    pub async fn invoke(&self, state: CitationState) -> Result<PipelineRun> {
        state.validate()?;

        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("citation_pipeline", %run_id);

        let state = self.run_stages(state).instrument(span).await?;
        Ok(PipelineRun { run_id, state })
    }

    /// Stages 1 and 2 only; used to inspect the retrieved source without rewriting
    pub async fn retrieve(&self, state: CitationState) -> Result<CitationState> {
        info!("Stage 1: formulating query...");
        let update = execute_query_stage(&self.completion, &state, &self.config.query).await?;
        let state = state.merge(update)?;

        info!("Stage 2: retrieving source...");
        let update = execute_search_stage(&self.search, &state, &self.config.search).await?;
        Ok(state.merge(update)?)
    }

    async fn run_stages(&self, state: CitationState) -> Result<CitationState> {
        let state = self.retrieve(state).await?;

        info!("Stage 3: rewriting with citation...");
        let update = execute_rewrite_stage(&self.completion, &state, &self.config.rewrite).await?;
        let state = state.merge(update)?;

        info!("Pipeline complete");
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StateError;
    use crate::testing::{boiling_page, MockCompletion, MockSearch};

    const CLAIM: &str = "Water boils at 100 degrees Celsius at sea level.";
    const REWRITE: &str = "Water boils at \"100°C (212°F) at standard pressure\" (Britannica, 2020).\n\nSources\nBritannica. (2020). *Boiling point*. https://example.org/boiling  ";

    #[tokio::test]
    async fn test_boiling_point_scenario() {
        let completion = MockCompletion::with_answers(&["boiling point of water at sea level", REWRITE]);
        let search = MockSearch::pages(vec![boiling_page()]);
        let pipeline = CitationPipeline::new(completion, search);

        let run = pipeline.run(CLAIM).await.unwrap();
        let state = run.state;

        assert_eq!(state.sentence(), CLAIM);
        assert_eq!(state.query(), Some("boiling point of water at sea level"));
        assert_eq!(state.source_title(), Some("Boiling point"));
        assert_eq!(state.source_url(), Some("https://example.org/boiling"));
        assert_eq!(
            state.quote(),
            Some("Water boils at 100°C (212°F) at standard pressure (Britannica, 2020).")
        );

        let enhanced = state.enhanced().unwrap();
        assert!(enhanced.contains('"'));
        assert!(enhanced.contains("(Britannica, 2020)"));
        assert!(enhanced.contains("https://example.org/boiling"));

        assert_eq!(pipeline.search.requests()[0].query, "boiling point of water at sea level");
        assert_eq!(pipeline.completion.call_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_results_still_rewrite() {
        let completion = MockCompletion::with_answers(&[
            "boiling point water",
            "Water reaches its boiling point at 100 degrees Celsius at sea level.",
        ]);
        let pipeline = CitationPipeline::new(completion, MockSearch::empty());

        let state = pipeline.run(CLAIM).await.unwrap().state;

        assert_eq!(state.source_title(), Some("No sources found."));
        assert_eq!(state.quote(), Some(""));
        assert_eq!(state.source_url(), Some(""));
        assert!(!state.enhanced().unwrap().is_empty());
        assert_eq!(pipeline.completion.call_count(), 2);
    }

    #[tokio::test]
    async fn test_search_error_status_still_rewrite() {
        let completion = MockCompletion::with_answers(&["q", "Rewritten claim."]);
        let pipeline = CitationPipeline::new(completion, MockSearch::status(500));

        let state = pipeline.run(CLAIM).await.unwrap().state;

        assert_eq!(state.source_title(), Some("LangSearch API error"));
        assert_eq!(state.quote(), Some(""));
        assert_eq!(state.enhanced(), Some("Rewritten claim."));
    }

    #[tokio::test]
    async fn test_query_failure_halts_before_search() {
        let completion = MockCompletion::default();
        completion.push_error("authentication failed");
        let pipeline = CitationPipeline::new(completion, MockSearch::empty());

        let result = pipeline.run(CLAIM).await;

        assert!(result.is_err());
        assert!(pipeline.search.requests().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_halts_before_rewrite() {
        let completion = MockCompletion::with_answers(&["q"]);
        let pipeline = CitationPipeline::new(completion, MockSearch::transport_error("dns"));

        assert!(pipeline.run(CLAIM).await.is_err());
        assert_eq!(pipeline.completion.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_sentence_makes_no_calls() {
        let pipeline = CitationPipeline::new(MockCompletion::default(), MockSearch::empty());

        let err = pipeline.run("  ").await.unwrap_err();

        assert_eq!(err.downcast_ref::<StateError>(), Some(&StateError::EmptySentence));
        assert_eq!(pipeline.completion.call_count(), 0);
    }

    #[tokio::test]
    async fn test_invoke_accepts_deserialized_state() {
        let completion = MockCompletion::with_answers(&["q", "Rewritten claim."]);
        let pipeline = CitationPipeline::new(completion, MockSearch::empty());
        let state: CitationState =
            serde_json::from_str(&format!(r#"{{"sentence": "{}"}}"#, CLAIM)).unwrap();

        let run = pipeline.invoke(state).await.unwrap();

        assert_eq!(run.state.enhanced(), Some("Rewritten claim."));
        assert!(pipeline.completion.prompts()[0].ends_with(CLAIM));
    }

    #[test]
    fn test_blank_deserialized_state_never_reaches_pipeline() {
        let result = serde_json::from_str::<CitationState>(r#"{"sentence": "   "}"#);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_retrieve_skips_rewrite() {
        let completion = MockCompletion::with_answers(&["q"]);
        let pipeline = CitationPipeline::new(completion, MockSearch::pages(vec![boiling_page()]));

        let state = pipeline
            .retrieve(CitationState::new(CLAIM).unwrap())
            .await
            .unwrap();

        assert_eq!(state.source_title(), Some("Boiling point"));
        assert!(state.enhanced().is_none());
        assert_eq!(pipeline.completion.call_count(), 1);
    }
}
