//! Configuration module for the taxocode system
//!
//! This module provides configuration structures and loading mechanisms for
//! the search controller, the oracle backends and batch classification.
//! Configuration can be loaded from TOML files and/or environment variables.

mod defaults;
mod loading;


use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use defaults::*;

/// Oracle providers understood by [`OracleConfig::provider`]
pub const VALID_ORACLE_PROVIDERS: [&str; 2] = ["openai", "anthropic"];

/// Returns the path to the global configuration file
///
/// The global config is stored at `~/.taxocode/config.toml`.
pub fn global_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| Error::config("Unable to determine home directory".to_string()))?;
    Ok(home_dir.join(".taxocode").join("config.toml"))
}

/// How candidate descriptions are listed in the oracle prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PromptStyle {
    /// One bare description per line (default)
    #[default]
    Plain,
    /// Each description prefixed with `* `, for chat models that echo bullets
    Bulleted,
}

/// Main configuration structure for the taxocode system
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Tree search configuration
    #[serde(default)]
    pub search: SearchConfig,

    /// Oracle (language model) configuration
    #[serde(default)]
    pub oracle: OracleConfig,

    /// Batch classification configuration
    #[serde(default)]
    pub batch: BatchConfig,
}

/// Configuration for the budgeted tree search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum oracle rounds per document
    #[serde(default = "default_budget")]
    pub budget: usize,

    /// Candidate list layout in the prompt
    #[serde(default)]
    pub prompt_style: PromptStyle,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            budget: default_budget(),
            prompt_style: PromptStyle::default(),
        }
    }
}

/// Configuration for the relevance oracle
///
/// # Providers
/// - `openai` (default): any OpenAI-compatible chat completions endpoint,
///   uses `OPENAI_API_KEY` when `api_key` is unset
/// - `anthropic`: Anthropic Messages API, uses `ANTHROPIC_API_KEY`
#[derive(Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Provider type: "openai" (default), "anthropic"
    #[serde(default = "default_oracle_provider")]
    pub provider: String,

    /// Model name to use
    #[serde(default = "default_oracle_model")]
    pub model: String,

    /// API key for authentication (or use the provider's env var)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_oracle_api_base_url")]
    pub api_base_url: String,

    /// Sampling temperature
    #[serde(default = "default_oracle_temperature")]
    pub temperature: f32,

    /// Maximum tokens in a reply
    #[serde(default = "default_oracle_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_oracle_timeout_secs")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for OracleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "***REDACTED***"))
            .field("api_base_url", &self.api_base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            provider: default_oracle_provider(),
            model: default_oracle_model(),
            api_key: None,
            api_base_url: default_oracle_api_base_url(),
            temperature: default_oracle_temperature(),
            max_tokens: default_oracle_max_tokens(),
            timeout_secs: default_oracle_timeout_secs(),
        }
    }
}

impl OracleConfig {
    /// Resolve the API key from config, falling back to the provider's env var
    pub fn resolve_api_key(&self) -> Option<String> {
        let env_var = match self.provider.as_str() {
            "anthropic" => "ANTHROPIC_API_KEY",
            _ => "OPENAI_API_KEY",
        };
        self.api_key
            .clone()
            .filter(|key| !key.is_empty())
            .or_else(|| std::env::var(env_var).ok())
    }
}

/// Configuration for classifying many documents in one invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Documents classified concurrently
    #[serde(default = "default_max_concurrent_documents")]
    pub max_concurrent_documents: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_documents: default_max_concurrent_documents(),
        }
    }
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if !VALID_ORACLE_PROVIDERS.contains(&self.oracle.provider.as_str()) {
            return Err(Error::config(format!(
                "Invalid oracle provider '{}'. Must be one of: {:?}",
                self.oracle.provider, VALID_ORACLE_PROVIDERS
            )));
        }

        if self.oracle.model.trim().is_empty() {
            return Err(Error::config("oracle.model must not be empty".to_string()));
        }

        if !(0.0..=2.0).contains(&self.oracle.temperature) {
            return Err(Error::config(format!(
                "oracle.temperature must be between 0.0 and 2.0 (got {})",
                self.oracle.temperature
            )));
        }

        if self.oracle.max_tokens == 0 {
            return Err(Error::config(
                "oracle.max_tokens must be greater than 0".to_string(),
            ));
        }

        if self.oracle.timeout_secs == 0 {
            return Err(Error::config(
                "oracle.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.batch.max_concurrent_documents == 0 {
            return Err(Error::config(
                "batch.max_concurrent_documents must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
