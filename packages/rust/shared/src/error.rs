//! Error types for SiteKit.
//!
//! Library crates use [`SiteKitError`] and [`FetchError`] via `thiserror`.
//! The CLI wraps these with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Failure to list slugs from the content store.
///
/// A fetch either yields the complete slug sequence or one of these; callers
/// never see a partial result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The content store could not be reached (DNS, connect, timeout).
    #[error("content store unreachable at {url}: {message}")]
    Unreachable { url: String, message: String },

    /// The content store answered with a non-success status.
    #[error("content store returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// The response body was not the expected shape.
    #[error("malformed content store response: {message}")]
    Malformed { message: String },
}

impl FetchError {
    /// Create a malformed-response error from any displayable message.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed {
            message: msg.into(),
        }
    }
}

/// Top-level error type for all SiteKit operations.
#[derive(Debug, thiserror::Error)]
pub enum SiteKitError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Input rejected at a call boundary (bad path, bad slug, bad URL).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Content store fetch failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Writing an artifact (XML, JSON) failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SiteKitError>;

impl SiteKitError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
