//! Error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A dispatch that did not produce a unique implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("no applicable implementation of `{method}`")]
    NoApplicable { method: String },

    #[error(
        "ambiguous dispatch of `{method}`: {} candidates are equally specific: {}",
        .candidates.len(),
        .candidates.join(", ")
    )]
    Ambiguous {
        method: String,
        /// Descriptions of the competing implementations.
        candidates: Vec<String>,
    },
}

/// Errors raised while registering implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("`{method}` already has an implementation with signature {signature}")]
    DuplicateSignature { method: String, signature: String },
}

/// Errors raised while loading a [`DispatchConfig`](crate::DispatchConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid dispatch config: {0}")]
    Parse(#[from] toml::de::Error),
}
