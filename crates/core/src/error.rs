use thiserror::Error;

/// Result type for taxocode operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for taxocode operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A code was looked up that the taxonomy does not define
    #[error("Unknown taxonomy code: {0}")]
    UnknownCode(String),

    /// The taxonomy data is not a strict tree
    #[error("Invalid taxonomy: {0}")]
    InvalidTaxonomy(String),

    /// JSON (de)serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Creates a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an unknown code error
    pub fn unknown_code(code: impl Into<String>) -> Self {
        Self::UnknownCode(code.into())
    }

    /// Creates an invalid taxonomy error
    pub fn invalid_taxonomy(msg: impl Into<String>) -> Self {
        Self::InvalidTaxonomy(msg.into())
    }

    /// Adds context to any error
    pub fn with_context<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::WithContext {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::with_context(context, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_code_message() {
        let err = Error::unknown_code("Z99");
        assert_eq!(err.to_string(), "Unknown taxonomy code: Z99");
    }

    #[test]
    fn test_result_ext_adds_context() {
        let io: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let err = io.context("Failed to read taxonomy").unwrap_err();
        assert!(err.to_string().starts_with("Failed to read taxonomy: "));
        assert!(err.to_string().contains("missing"));
    }
}
