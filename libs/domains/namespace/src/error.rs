use core_config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NamespaceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid project name: {0}")]
    Validation(String),

    #[error("Index '{0}' not found")]
    IndexNotFound(String),

    #[error("Pinecone API error ({status}): {message}")]
    Pinecone { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Namespace verification failed: {0}")]
    Verification(String),

    #[error("Aborted")]
    Aborted,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type NamespaceResult<T> = Result<T, NamespaceError>;

impl NamespaceError {
    /// Wrap a failed probe step, keeping the underlying message verbatim.
    pub fn verification(step: &str, err: NamespaceError) -> Self {
        NamespaceError::Verification(format!("{} failed: {}", step, err))
    }
}

impl From<reqwest::Error> for NamespaceError {
    fn from(err: reqwest::Error) -> Self {
        NamespaceError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for NamespaceError {
    fn from(err: serde_json::Error) -> Self {
        NamespaceError::Internal(format!("JSON error: {}", err))
    }
}

impl From<ConfigError> for NamespaceError {
    fn from(err: ConfigError) -> Self {
        NamespaceError::Config(err.to_string())
    }
}
