//! Error types.
//!
//! Only stream-level failures are errors. Missing fields, unknown kinds and
//! pods that cannot be reverted are handled as no-ops by the rule sets.

use std::error::Error as StdError;

use thiserror::Error;

/// Boxed encoder error, so YAML and JSON failures share one variant.
pub type EncodeSource = Box<dyn StdError + Send + Sync>;

/// CleanupError is a fatal failure of a cleaning run.
#[derive(Debug, Error)]
pub enum CleanupError {
    #[error("error decoding YAML document {index}: {source}")]
    Decode {
        /// 1-based position of the document in the input stream.
        index: usize,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("error encoding cleaned {kind}/{name}: {source}")]
    Encode {
        kind: String,
        name: String,
        #[source]
        source: EncodeSource,
    },

    #[error("error writing cleaned {kind}/{name}: {source}")]
    Write {
        kind: String,
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

impl CleanupError {
    /// Creates an encode error for the given resource.
    pub fn encode(
        kind: impl Into<String>,
        name: impl Into<String>,
        source: impl Into<EncodeSource>,
    ) -> Self {
        CleanupError::Encode {
            kind: kind.into(),
            name: name.into(),
            source: source.into(),
        }
    }

    /// Creates a write error for the given resource.
    pub fn write(kind: impl Into<String>, name: impl Into<String>, source: std::io::Error) -> Self {
        CleanupError::Write {
            kind: kind.into(),
            name: name.into(),
            source,
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, CleanupError>;
