use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use citegraph::{
    read_sentence, AzureOpenAiClient, AzureOpenAiConfig, CitationPipeline, CitationReport,
    CitationState, Freshness, LangSearchClient, LangSearchConfig, PipelineConfig, SearchConfig,
};

#[derive(Parser)]
#[command(name = "citegraph")]
#[command(author, version, about = "Back a claim with a quoted, cited source", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite a claim with a supporting quote and citation
    Enhance {
        /// The claim to support (omit when using --input)
        sentence: Option<String>,

        /// Read the claim from a file ("-" for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Write the full state record as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Search recency filter (oneDay, oneWeek, oneMonth, oneYear, noLimit)
        #[arg(long, default_value = "noLimit")]
        freshness: Freshness,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Formulate a query and show the source that would be cited, without rewriting
    Search {
        /// The claim to support (omit when using --input)
        sentence: Option<String>,

        /// Read the claim from a file ("-" for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Search recency filter (oneDay, oneWeek, oneMonth, oneYear, noLimit)
        #[arg(long, default_value = "noLimit")]
        freshness: Freshness,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Enhance {
            sentence,
            input,
            output,
            freshness,
            verbose,
        } => {
            setup_logging(verbose);
            let sentence = read_sentence(sentence.as_deref(), input.as_deref())?;
            enhance(&sentence, output, freshness).await
        }
        Commands::Search {
            sentence,
            input,
            freshness,
            verbose,
        } => {
            setup_logging(verbose);
            let sentence = read_sentence(sentence.as_deref(), input.as_deref())?;
            search(&sentence, freshness).await
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn build_pipeline(
    freshness: Freshness,
) -> Result<CitationPipeline<AzureOpenAiClient, LangSearchClient>> {
    let completion = AzureOpenAiClient::new(AzureOpenAiConfig::from_env()?);
    let search = LangSearchClient::new(LangSearchConfig::from_env()?);

    let config = PipelineConfig {
        search: SearchConfig {
            freshness,
            ..Default::default()
        },
        ..Default::default()
    };

    Ok(CitationPipeline::with_config(completion, search, config))
}

async fn enhance(sentence: &str, output: Option<PathBuf>, freshness: Freshness) -> Result<()> {
    let pipeline = build_pipeline(freshness)?;

    info!("Enhancing claim ({} chars)", sentence.len());
    let run = pipeline.run(sentence).await.context("Citation pipeline failed")?;

    let report = CitationReport::from_state(&run.state, Some(run.run_id));
    if let Some(path) = output {
        report.write_json(&path)?;
        info!("State written to {:?}", path);
    }

    println!("{}", report.format_text());
    Ok(())
}

async fn search(sentence: &str, freshness: Freshness) -> Result<()> {
    let pipeline = build_pipeline(freshness)?;

    let state = pipeline
        .retrieve(CitationState::new(sentence)?)
        .await
        .context("Source retrieval failed")?;

    let report = CitationReport::from_state(&state, None);
    print!("{}", report.format_source());
    Ok(())
}
