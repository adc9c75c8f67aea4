//! Error types for the area weather lookup pipeline

use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single weather lookup.
///
/// Every variant is terminal for the request that produced it; nothing is
/// retried internally.
#[derive(Error, Debug)]
pub enum LookupError {
    /// The area code table could not be read
    #[error("failed to read area code table {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The requested area name has no entry in the table
    #[error("no area code for '{area}'")]
    AreaNotFound { area: String },

    /// Transport-level failure while requesting the provider page
    #[error("request failed: {0}")]
    Network(String),

    /// The provider responded but the body could not be read
    #[error("failed to read response: {0}")]
    Read(String),

    /// The provider did not answer within the configured timeout
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The fetched document could not be parsed as markup
    #[error("failed to parse document: {0}")]
    Parse(String),
}

impl LookupError {
    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network(message.into())
    }

    /// Create a new read error
    pub fn read<S: Into<String>>(message: S) -> Self {
        Self::Read(message.into())
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Whether the failure happened while talking to or reading from the provider
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Read(_) | Self::Timeout(_) | Self::Parse(_)
        )
    }
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Self::Invalid(message.into())
    }
}
