//! Error types for BlogFactory.
//!
//! Library crates use [`BlogFactoryError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for every pipeline stage.
///
/// Nothing in the pipeline recovers from any of these; each one aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum BlogFactoryError {
    /// The news search returned no elements matching the topic selector.
    #[error("no topics found for query '{query}'")]
    NoTopicsFound { query: String },

    /// Generated text contains no sentence-terminal punctuation.
    #[error("generated content for '{title}' has no sentence boundary")]
    NoSentenceBoundary { title: String },

    /// HTTP failure talking to the search, generation, or storage service.
    #[error("{service} request failed: {message}")]
    UpstreamRequest { service: String, message: String },

    /// The generation loop hit its continuation cap before reaching the desired length.
    #[error("generation for '{title}' did not reach the desired length after {iterations} continuations")]
    GenerationLimit { title: String, iterations: usize },

    /// Two titles in one run sanitize to the same storage key.
    #[error("storage key collision at {key}: '{first}' and '{second}'")]
    KeyCollision {
        key: String,
        first: String,
        second: String,
    },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Search-result markup could not be turned into a topic.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Object store failure not caused by a remote request.
    #[error("storage error: {0}")]
    Storage(String),

    /// JSON encoding or decoding error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BlogFactoryError>;

impl BlogFactoryError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create an upstream error attributed to `service` ("search", "generation", "storage").
    pub fn upstream(service: &str, msg: impl Into<String>) -> Self {
        Self::UpstreamRequest {
            service: service.to_string(),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = BlogFactoryError::config("bucket_id is empty");
        assert_eq!(err.to_string(), "config error: bucket_id is empty");

        let err = BlogFactoryError::upstream("search", "HTTP 503");
        assert_eq!(err.to_string(), "search request failed: HTTP 503");
    }

    #[test]
    fn no_topics_carries_query() {
        let err = BlogFactoryError::NoTopicsFound {
            query: "rust async runtimes".into(),
        };
        assert!(err.to_string().contains("rust async runtimes"));
    }

    #[test]
    fn serde_errors_convert() {
        let parse_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: BlogFactoryError = parse_err.into();
        assert!(matches!(err, BlogFactoryError::Serialization(_)));
    }
}
