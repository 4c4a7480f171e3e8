//! Error types for docrag.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::{IndexReport, SearchResult};

/// Errors related to embedding operations.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("failed to connect to embedding service: {0}")]
    ConnectionError(String),

    #[error("embedding service error: {0}")]
    ServerError(String),

    #[error("embedding request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),

    #[error("embedding timeout")]
    Timeout,
}

/// Errors related to answer generation.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("failed to connect to generation service: {0}")]
    ConnectionError(String),

    #[error("generation service error: {0}")]
    ServerError(String),

    #[error("generation request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("no response generated")]
    EmptyResponse,

    #[error("invalid generation response: {0}")]
    InvalidResponse(String),

    #[error("generation timeout")]
    Timeout,
}

/// Errors raised while waiting on the rate limiter.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateLimitError {
    #[error("rate limiter wait aborted by cancellation")]
    Aborted,
}

/// Errors related to the persisted vector store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access vector store at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed vector store at {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize vector store: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Errors related to building the file tree.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Errors related to indexing operations.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error(
        "indexing aborted after {} of {} documents",
        .0.processed(),
        .0.documents
    )]
    Aborted(IndexReport),

    #[error("failed to persist vector store: {0}")]
    Store(#[from] StoreError),
}

/// Errors related to search and query operations.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("query aborted")]
    Aborted,

    #[error("failed to create query embedding: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Generation failed after retrieval; the retrieved context is kept.
    #[error("answer generation failed: {source}")]
    Generation {
        #[source]
        source: GenerationError,
        results: Vec<SearchResult>,
    },
}

impl From<RateLimitError> for QueryError {
    fn from(_: RateLimitError) -> Self {
        QueryError::Aborted
    }
}

/// Errors related to configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    #[error("path error: {0}")]
    PathError(String),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("{0} environment variable not set")]
    MissingCredential(String),
}

/// Application-level errors that wrap domain errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("index error: {0}")]
    Index(#[from] IndexError),

    #[error("query error: {0}")]
    Query(#[from] QueryError),

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_abort_maps_to_query_abort() {
        let err: QueryError = RateLimitError::Aborted.into();
        assert!(matches!(err, QueryError::Aborted));
    }

    #[test]
    fn test_index_abort_message_reports_progress() {
        let report = IndexReport {
            documents: 5,
            embedded: 2,
            already_indexed: 1,
            ..Default::default()
        };
        let err = IndexError::Aborted(report);
        assert_eq!(err.to_string(), "indexing aborted after 3 of 5 documents");
    }

    #[test]
    fn test_client_setup_error_converts_to_app_error() {
        let err: AppError = EmbeddingError::ConnectionError("tls backend".to_string()).into();
        assert!(matches!(err, AppError::Embedding(_)));
    }

    #[test]
    fn test_missing_credential_message() {
        let err = ConfigError::MissingCredential("GEMINI_API_KEY".to_string());
        assert_eq!(err.to_string(), "GEMINI_API_KEY environment variable not set");
    }
}
