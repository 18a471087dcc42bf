pub mod io;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod search;
pub mod stages;

#[cfg(test)]
mod testing;

pub use io::{read_sentence, CitationReport};
pub use llm::{AzureOpenAiClient, AzureOpenAiConfig, CompletionService};
pub use models::{CitationState, Freshness, SourceLookup, StateError, StateUpdate};
pub use pipeline::{CitationPipeline, PipelineConfig, PipelineRun};
pub use search::{LangSearchClient, LangSearchConfig, SearchReply, SearchService};
pub use stages::{
    execute_query_stage, execute_rewrite_stage, execute_search_stage, QueryConfig, RewriteConfig,
    SearchConfig,
};
