use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ScreeningError;

/// Default model when `OPENAI_MODEL` is not set
pub const DEFAULT_MODEL: &str = "gpt-4o";
/// Default API root when `OPENAI_BASE_URL` is not set
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Anything that can turn a screening prompt into raw model text.
///
/// The returned text is expected to be the analysis JSON document; parsing
/// and validation happen in the screening stage.
pub trait VerdictProvider {
    /// Identifier of the model answering the prompt
    fn model(&self) -> &str;

    /// Send the prompt and return the model's raw text output
    fn analyze(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<String, ScreeningError>> + Send;
}

/// Configuration for the OpenAI API client
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key (from OPENAI_API_KEY env var)
    pub api_key: String,
    /// Model to use (e.g., "gpt-4o", "gpt-4.1-mini")
    pub model: String,
    /// API root, without trailing slash
    pub base_url: String,
    /// Temperature (0-2, lower = more deterministic)
    pub temperature: f64,
}

impl OpenAiConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self, ScreeningError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ScreeningError::MissingCredentials)?;

        let mut config = Self::new(api_key, DEFAULT_MODEL.to_string());
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            if !model.trim().is_empty() {
                config.model = model;
            }
        }
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            if !base_url.trim().is_empty() {
                config.base_url = base_url.trim_end_matches('/').to_string();
            }
        }

        Ok(config)
    }

    /// Create with custom settings
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.2,
        }
    }

    /// Override the model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn responses_url(&self) -> String {
        format!("{}/responses", self.base_url)
    }
}

/// OpenAI Responses API client
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Send a prompt constrained to JSON-object output and return the text
    pub async fn send_json_prompt(&self, prompt: &str) -> Result<String, ScreeningError> {
        let request = ResponsesRequest {
            model: self.config.model.clone(),
            input: prompt.to_string(),
            text: TextConfig {
                format: TextFormat {
                    format_type: "json_object".to_string(),
                },
            },
            temperature: Some(self.config.temperature),
        };

        debug!(
            "Sending {} prompt chars to {} ({})",
            prompt.len(),
            self.config.responses_url(),
            self.config.model
        );

        let response = self
            .client
            .post(self.config.responses_url())
            .bearer_auth(&self.config.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ScreeningError::Api { status, body });
        }

        let response: ResponsesResponse = response.json().await?;

        let text = response.output_text();
        if text.trim().is_empty() {
            return Err(ScreeningError::EmptyResponse);
        }
        Ok(text)
    }
}

impl VerdictProvider for OpenAiClient {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn analyze(&self, prompt: &str) -> Result<String, ScreeningError> {
        self.send_json_prompt(prompt).await
    }
}

#[derive(Debug, Serialize)]
struct ResponsesRequest {
    model: String,
    input: String,
    text: TextConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Debug, Serialize)]
struct TextConfig {
    format: TextFormat,
}

#[derive(Debug, Serialize)]
struct TextFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
}

impl ResponsesResponse {
    /// Concatenate every `output_text` block of every message item
    fn output_text(&self) -> String {
        self.output
            .iter()
            .filter(|item| item.item_type == "message")
            .flat_map(|item| item.content.iter())
            .filter(|c| c.content_type == "output_text")
            .map(|c| c.text.as_str())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(rename = "type")]
    item_type: String,
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Debug, Deserialize)]
struct OutputContent {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}
