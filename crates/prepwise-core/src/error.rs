use thiserror::Error;

/// Top-level error type for Prepwise.
///
/// Covers loading and validating the static inputs the engine is initialized
/// with. The dialogue engine has its own error type and converts from this
/// one so that `?` works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PrepwiseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for PrepwiseError {
    fn from(err: toml::de::Error) -> Self {
        PrepwiseError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for PrepwiseError {
    fn from(err: toml::ser::Error) -> Self {
        PrepwiseError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for PrepwiseError {
    fn from(err: serde_json::Error) -> Self {
        PrepwiseError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Prepwise operations.
pub type Result<T> = std::result::Result<T, PrepwiseError>;
