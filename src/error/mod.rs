//! Error types for oauth-credential.

use thiserror::Error;

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InvalidInput,
    Configuration,
    Io,
    Serialization,
}

/// Errors raised by the validating constructors and the config layer.
///
/// The core credential operations (`new`, `set_request_token`, `is_expired`)
/// never fail and do not return this type.
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CredentialError {
    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidArgument(_) => ErrorCategory::InvalidInput,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Io(_) => ErrorCategory::Io,
            Self::Serialization(_) => ErrorCategory::Serialization,
        }
    }

    /// Whether fixing the caller's settings (env, config file) would resolve this error.
    pub fn is_config_related(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Configuration | ErrorCategory::Serialization
        )
    }
}

impl From<toml::de::Error> for CredentialError {
    fn from(error: toml::de::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, CredentialError>;
