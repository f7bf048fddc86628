//! Error types for the `opsrag` crate.

use thiserror::Error;

/// Errors that can occur in the retrieval core.
///
/// Only [`EmptyScope`](RetrievalError::EmptyScope) is terminal for a query.
/// Every other variant is degraded past by its caller: extraction failures
/// leave the document recorded unparsed, semantic failures fall back to
/// lexical ranking, and composition failures fall back to the extractive
/// answer.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// Text extraction failed for an uploaded document.
    #[error("Extraction error ({name}): {message}")]
    Extraction {
        /// The document the extractor was processing.
        name: String,
        /// A description of the failure.
        message: String,
    },

    /// The embedding collaborator failed to produce a query embedding.
    #[error("Semantic retrieval error ({provider}): {message}")]
    Semantic {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The answer-composition collaborator failed.
    #[error("Composition error ({provider}): {message}")]
    Composition {
        /// The composer that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// No chunks are in scope for the query.
    #[error("no documents in scope")]
    EmptyScope,

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;
