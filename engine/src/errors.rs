//! Engine error types
//!
//! The planning core is pure computation over normalized inputs, so errors only
//! surface at the edges: configuration, snapshot decoding, clock settings.
//! Business outcomes (no data, no progress, budget exhausted) are values, never
//! errors.

use thiserror::Error;

/// Error category for structured logging and exit-code mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// `engine.toml` or env misconfigured
    ConfigError,
    /// Item snapshot could not be read or decoded
    SnapshotError,
}

impl ErrorCategory {
    /// Machine-readable code for logging
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConfigError => "CONFIG_ERROR",
            Self::SnapshotError => "SNAPSHOT_ERROR",
        }
    }
}

/// Engine error with category and context
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("config error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("snapshot error: {message}")]
    Snapshot {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl EngineError {
    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config { .. } => ErrorCategory::ConfigError,
            Self::Snapshot { .. } => ErrorCategory::SnapshotError,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a config error with source
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a snapshot error with source
    pub fn snapshot_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Snapshot {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
