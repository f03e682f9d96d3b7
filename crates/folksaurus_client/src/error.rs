//! Error types for the client.

use folksaurus_protocol::ProtocolError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for client operations.
pub type FolksaurusResult<T> = Result<T, FolksaurusError>;

/// Errors that can occur while configuring the client or talking to the
/// service and the local store.
///
/// Expected service answers (not found, gone, forbidden, ...) are never
/// errors; they are carried by [`folksaurus_protocol::Outcome`].
#[derive(Error, Debug)]
pub enum FolksaurusError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path:?}: {source}")]
    ConfigRead {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Required configuration keys are absent.
    #[error("values missing for the following keys: {}", .0.join(","))]
    MissingConfigKeys(Vec<String>),

    /// The requested configuration section does not exist.
    #[error("section {0:?} not found in config")]
    ConfigSectionNotFound(String),

    /// A configuration value has the wrong type or range.
    #[error("invalid value for config key {key}: {message}")]
    InvalidConfigValue {
        /// Config key.
        key: String,
        /// What is wrong with the value.
        message: String,
    },

    /// Network or transport error.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
        /// Whether the operation can be retried.
        retryable: bool,
    },

    /// A response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] ProtocolError),

    /// A term record failed validation.
    #[error("invalid term: {0}")]
    InvalidTerm(String),

    /// The local store failed.
    #[error("store error: {0}")]
    Store(String),
}

impl FolksaurusError {
    /// Creates a retryable transport error.
    pub fn transport_retryable(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a non-retryable transport error.
    pub fn transport_fatal(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: false,
        }
    }

    /// Creates a store error.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// Returns true if this error can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            FolksaurusError::Transport { retryable, .. } => *retryable,
            _ => false,
        }
    }

    /// Returns true for configuration errors, which are fatal at startup.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            FolksaurusError::ConfigRead { .. }
                | FolksaurusError::ConfigParse(_)
                | FolksaurusError::MissingConfigKeys(_)
                | FolksaurusError::ConfigSectionNotFound(_)
                | FolksaurusError::InvalidConfigValue { .. }
        )
    }
}

impl From<std::io::Error> for FolksaurusError {
    fn from(err: std::io::Error) -> Self {
        FolksaurusError::Store(err.to_string())
    }
}

impl From<serde_json::Error> for FolksaurusError {
    fn from(err: serde_json::Error) -> Self {
        FolksaurusError::Store(format!("invalid store data: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_errors() {
        assert!(FolksaurusError::transport_retryable("connection reset").is_retryable());
        assert!(!FolksaurusError::transport_fatal("invalid certificate").is_retryable());
        assert!(!FolksaurusError::InvalidTerm("empty name".into()).is_retryable());
    }

    #[test]
    fn missing_keys_are_listed() {
        let err = FolksaurusError::MissingConfigKeys(vec!["api_key".into(), "api_url".into()]);
        assert_eq!(
            err.to_string(),
            "values missing for the following keys: api_key,api_url"
        );
        assert!(err.is_config_error());
        assert!(!FolksaurusError::store("disk full").is_config_error());
    }
}
