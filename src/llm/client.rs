use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, Instrument};

/// A text-completion service: one directive in, free text out
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Complete a single directive. `run_name` labels the call for observability.
    async fn complete(&self, prompt: &str, run_name: Option<&str>) -> Result<String>;
}

/// Configuration for the Azure OpenAI chat completions client
#[derive(Debug, Clone)]
pub struct AzureOpenAiConfig {
    /// API key (from OPENAI_API_KEY env var)
    pub api_key: String,
    /// Resource endpoint, e.g. "https://my-resource.openai.azure.com/"
    pub endpoint: String,
    /// Deployment name (e.g., "gpt-4o")
    pub deployment: String,
    /// REST API version
    pub api_version: String,
    /// Temperature (0 = deterministic)
    pub temperature: f64,
    /// Maximum tokens in response
    pub max_tokens: u32,
}

impl AzureOpenAiConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .context("OPENAI_API_KEY environment variable not set")?;
        let endpoint = std::env::var("AZURE_OPENAI_ENDPOINT")
            .context("AZURE_OPENAI_ENDPOINT environment variable not set")?;

        let mut config = Self::new(api_key, endpoint);
        if let Ok(deployment) = std::env::var("AZURE_OPENAI_DEPLOYMENT") {
            config.deployment = deployment;
        }
        if let Ok(api_version) = std::env::var("AZURE_OPENAI_API_VERSION") {
            config.api_version = api_version;
        }
        Ok(config)
    }

    /// Create with default deployment settings
    pub fn new(api_key: String, endpoint: String) -> Self {
        Self {
            api_key,
            endpoint,
            deployment: "gpt-4o".to_string(),
            api_version: "2024-08-01-preview".to_string(),
            temperature: 0.0,
            max_tokens: 1024,
        }
    }

    /// Full chat completions URL for the configured deployment
    pub fn chat_completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }
}

/// Azure OpenAI chat completions client
pub struct AzureOpenAiClient {
    client: Client,
    config: AzureOpenAiConfig,
}

impl AzureOpenAiClient {
    pub fn new(config: AzureOpenAiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    async fn send_message(&self, user: &str) -> Result<String> {
        let request = ChatRequest {
            messages: vec![Message {
                role: "user".to_string(),
                content: user.to_string(),
            }],
            temperature: Some(self.config.temperature),
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(self.config.chat_completions_url())
            .header("api-key", &self.config.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Azure OpenAI")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Azure OpenAI API error: {} - {}", status, body);
        }

        let response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse Azure OpenAI response")?;

        response.into_text()
    }
}

#[async_trait]
impl CompletionService for AzureOpenAiClient {
    async fn complete(&self, prompt: &str, run_name: Option<&str>) -> Result<String> {
        let span = tracing::info_span!(
            "completion",
            run_name = run_name.unwrap_or("unnamed"),
            deployment = %self.config.deployment
        );

        async {
            debug!("Sending {} char directive", prompt.len());
            let text = self.send_message(prompt).await?;
            debug!("Received {} chars", text.len());
            Ok::<_, anyhow::Error>(text)
        }
        .instrument(span)
        .await
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    /// Extract text from the first choice
    fn into_text(self) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .context("No text content in response")
    }
}
