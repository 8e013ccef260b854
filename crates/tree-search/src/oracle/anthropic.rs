//! Oracle backed by the Anthropic Messages API

use super::Oracle;
use crate::error::{Result, TreeSearchError};
use crate::prompts::build_classification_prompt;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use taxocode_core::{OracleConfig, PromptStyle};
use tracing::debug;

pub struct AnthropicOracle {
    client: Arc<claudius::Anthropic>,
    model: claudius::Model,
    max_tokens: u32,
    temperature: f32,
    timeout: Duration,
    style: PromptStyle,
}

impl std::fmt::Debug for AnthropicOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicOracle")
            .field("client", &"<Anthropic>")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("style", &self.style)
            .finish()
    }
}

impl AnthropicOracle {
    pub fn new(api_key: String, config: &OracleConfig, style: PromptStyle) -> Result<Self> {
        let client = claudius::Anthropic::new(Some(api_key)).map_err(|e| {
            TreeSearchError::Config(format!("Failed to create Anthropic client: {e}"))
        })?;

        Ok(Self {
            client: Arc::new(client),
            model: claudius::Model::Custom(config.model.clone()),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout: Duration::from_secs(config.timeout_secs),
            style,
        })
    }
}

#[async_trait]
impl Oracle for AnthropicOracle {
    async fn classify(&self, text: &str, candidates: &[String]) -> Result<String> {
        let prompt = build_classification_prompt(text, candidates, self.style);

        let params = claudius::MessageCreateParams::new(
            self.max_tokens,
            vec![claudius::MessageParam::user(prompt)],
            self.model.clone(),
        )
        .with_temperature(self.temperature)
        .map_err(|e| TreeSearchError::Config(format!("Invalid temperature: {e}")))?;

        debug!("Sending {} candidates to Anthropic oracle", candidates.len());

        let response = tokio::time::timeout(self.timeout, self.client.send(params))
            .await
            .map_err(|_| {
                TreeSearchError::Oracle(format!(
                    "Anthropic API call timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| TreeSearchError::Oracle(format!("Anthropic API call failed: {e}")))?;

        let reply = response
            .content
            .iter()
            .filter_map(|block| match block {
                claudius::ContentBlock::Text(text_block) => Some(text_block.text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n");

        if reply.trim().is_empty() {
            return Err(TreeSearchError::Oracle(format!(
                "Anthropic response contained no text ({} content blocks)",
                response.content.len()
            )));
        }

        Ok(reply)
    }
}
