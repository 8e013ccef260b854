//! Oracle backed by an OpenAI-compatible chat completions endpoint

use super::Oracle;
use crate::error::{truncate_for_error, Result, TreeSearchError};
use crate::prompts::build_classification_prompt;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use taxocode_core::{OracleConfig, PromptStyle};
use tracing::{debug, info};

/// Request payload for the chat completions API
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response from the chat completions API
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat completions oracle
pub struct ChatCompletionsOracle {
    client: Client,
    api_key: String,
    model: String,
    api_base_url: String,
    temperature: f32,
    max_tokens: u32,
    style: PromptStyle,
}

impl std::fmt::Debug for ChatCompletionsOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsOracle")
            .field("api_key", &"***REDACTED***")
            .field("model", &self.model)
            .field("api_base_url", &self.api_base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("style", &self.style)
            .finish()
    }
}

impl ChatCompletionsOracle {
    /// Create a new chat completions oracle
    ///
    /// # Arguments
    /// * `api_key` - Bearer token for the endpoint
    /// * `config` - Model, base URL, sampling and timeout settings
    /// * `style` - How candidates are listed in the prompt
    pub fn new(api_key: String, config: &OracleConfig, style: PromptStyle) -> Result<Self> {
        info!("Initializing chat completions oracle");
        info!("  Model: {}", config.model);
        info!("  API Base URL: {}", config.api_base_url);
        info!("  Timeout: {}s", config.timeout_secs);

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TreeSearchError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            style,
        })
    }
}

#[async_trait]
impl Oracle for ChatCompletionsOracle {
    async fn classify(&self, text: &str, candidates: &[String]) -> Result<String> {
        let prompt = build_classification_prompt(text, candidates, self.style);

        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "",
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let url = format!("{}/chat/completions", self.api_base_url);
        debug!("Sending {} candidates to {}", candidates.len(), url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| TreeSearchError::Oracle(format!("Chat completions request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(TreeSearchError::Oracle(format!(
                "Chat completions API returned error {status}: {}",
                truncate_for_error(&error_text)
            )));
        }

        let body = response.text().await.map_err(|e| {
            TreeSearchError::Oracle(format!("Failed to read chat completions response: {e}"))
        })?;

        let parsed: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            TreeSearchError::Oracle(format!(
                "Failed to parse chat completions response: {e}. Response: {}",
                truncate_for_error(&body)
            ))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                TreeSearchError::Oracle(format!(
                    "Chat completions response had no message content: {}",
                    truncate_for_error(&body)
                ))
            })
    }
}
