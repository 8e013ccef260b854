//! Error types for tree search operations

use thiserror::Error;

/// Maximum characters of an oracle payload quoted in an error message
const MAX_ERROR_EXCERPT_CHARS: usize = 200;

#[derive(Error, Debug)]
pub enum TreeSearchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API key not configured for oracle provider '{0}'")]
    MissingApiKey(String),

    /// Classification failure reported by the oracle; aborts the run
    #[error("Oracle error: {0}")]
    Oracle(String),

    /// Taxonomy lookup failure (unknown code); aborts the run
    #[error("Taxonomy error: {0}")]
    Taxonomy(#[from] taxocode_core::Error),
}

pub type Result<T> = std::result::Result<T, TreeSearchError>;

/// Shorten a payload for inclusion in an error message
pub(crate) fn truncate_for_error(text: &str) -> String {
    if text.chars().count() <= MAX_ERROR_EXCERPT_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX_ERROR_EXCERPT_CHARS).collect();
        format!("{head}...")
    }
}
