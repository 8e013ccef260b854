//! Relevance oracle abstraction and LLM-backed implementations

use crate::error::{Result, TreeSearchError};
use async_trait::async_trait;
use std::sync::Arc;
use taxocode_core::{OracleConfig, PromptStyle};
use tracing::info;

mod anthropic;
mod chat_completions;

pub use anthropic::AnthropicOracle;
pub use chat_completions::ChatCompletionsOracle;

/// Binary relevance judge over a batch of candidate descriptions
///
/// Returns the raw reply, one `<description>: <Yes|No>` line per candidate.
/// Any transport or model failure is an error; implementations do not retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Judge each candidate description against the input text
    ///
    /// `candidates` is sent in the given order.
    async fn classify(&self, text: &str, candidates: &[String]) -> Result<String>;
}

/// Create an oracle based on configuration
///
/// # Arguments
/// * `config` - Oracle configuration including provider type
/// * `style` - How candidates are listed in the prompt
pub fn create_oracle(config: &OracleConfig, style: PromptStyle) -> Result<Arc<dyn Oracle>> {
    let api_key = config
        .resolve_api_key()
        .ok_or_else(|| TreeSearchError::MissingApiKey(config.provider.clone()))?;

    match config.provider.as_str() {
        "openai" => {
            info!("Creating chat completions oracle ({})", config.model);
            Ok(Arc::new(ChatCompletionsOracle::new(api_key, config, style)?))
        }
        "anthropic" => {
            info!("Creating Anthropic oracle ({})", config.model);
            Ok(Arc::new(AnthropicOracle::new(api_key, config, style)?))
        }
        other => Err(TreeSearchError::Config(format!(
            "Unknown oracle provider: '{other}'. Valid providers: openai, anthropic"
        ))),
    }
}
