//! Configuration loading from files and environment variables

use crate::error::{Error, Result};
use config::{Config as ConfigLib, ConfigBuilder as LibConfigBuilder, Environment, File};
use std::path::Path;

use super::defaults::*;
use super::{global_config_path, Config};

/// Helper to set a config default with consistent error mapping
fn set_config_default<T: Into<config::Value>>(
    builder: LibConfigBuilder<config::builder::DefaultState>,
    key: &str,
    value: T,
) -> Result<LibConfigBuilder<config::builder::DefaultState>> {
    builder
        .set_default(key, value)
        .map_err(|e| Error::config(format!("Failed to set {key} default: {e}")))
}

impl Config {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// Environment variables are prefixed with `TAXOCODE_` and use double underscores
    /// for nested values. For example:
    /// - `TAXOCODE_SEARCH__BUDGET=20`
    /// - `TAXOCODE_ORACLE__PROVIDER=anthropic`
    pub fn from_file(path: &Path) -> Result<Self> {
        let builder = ConfigLib::builder();

        // Search defaults
        let builder = set_config_default(builder, "search.budget", default_budget() as i64)?;
        let builder = set_config_default(builder, "search.prompt_style", "plain")?;

        // Oracle defaults
        let builder = set_config_default(builder, "oracle.provider", default_oracle_provider())?;
        let builder = set_config_default(builder, "oracle.model", default_oracle_model())?;
        let builder = set_config_default(
            builder,
            "oracle.api_base_url",
            default_oracle_api_base_url(),
        )?;
        let builder = set_config_default(
            builder,
            "oracle.temperature",
            f64::from(default_oracle_temperature()),
        )?;
        let builder = set_config_default(
            builder,
            "oracle.max_tokens",
            i64::from(default_oracle_max_tokens()),
        )?;
        let builder = set_config_default(
            builder,
            "oracle.timeout_secs",
            default_oracle_timeout_secs() as i64,
        )?;

        // Batch defaults
        let mut builder = set_config_default(
            builder,
            "batch.max_concurrent_documents",
            default_max_concurrent_documents() as i64,
        )?;

        // Add the config file if it exists
        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        // Add environment variables with TAXOCODE_ prefix
        builder = builder.add_source(
            Environment::with_prefix("TAXOCODE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))
    }

    /// Creates a config from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from a single file
    ///
    /// Precedence (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Config file (~/.taxocode/config.toml or custom --config path)
    /// 3. Environment variables (TAXOCODE_*)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => global_config_path()?,
        };
        Self::from_file(&path)
    }
}
