//! Configuration for the retrieval core.

use serde::{Deserialize, Serialize};

use crate::bm25::DEFAULT_TOP_K;
use crate::chunking::DEFAULT_WORDS_PER_CHUNK;
use crate::error::{Result, RetrievalError};

/// Configuration parameters for ingestion and retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalConfig {
    /// Window size for the chunker, in words.
    pub words_per_chunk: usize,
    /// Number of passages selected per query.
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { words_per_chunk: DEFAULT_WORDS_PER_CHUNK, top_k: DEFAULT_TOP_K }
    }
}

impl RetrievalConfig {
    /// Create a new builder for constructing a [`RetrievalConfig`].
    pub fn builder() -> RetrievalConfigBuilder {
        RetrievalConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RetrievalConfig`].
#[derive(Debug, Clone, Default)]
pub struct RetrievalConfigBuilder {
    config: RetrievalConfig,
}

impl RetrievalConfigBuilder {
    /// Set the chunker window size in words.
    pub fn words_per_chunk(mut self, words: usize) -> Self {
        self.config.words_per_chunk = words;
        self
    }

    /// Set the number of passages selected per query.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Build the [`RetrievalConfig`], validating the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Config`] if `words_per_chunk` or `top_k`
    /// is zero.
    pub fn build(self) -> Result<RetrievalConfig> {
        if self.config.words_per_chunk == 0 {
            return Err(RetrievalError::Config(
                "words_per_chunk must be greater than zero".to_string(),
            ));
        }
        if self.config.top_k == 0 {
            return Err(RetrievalError::Config("top_k must be greater than zero".to_string()));
        }
        Ok(self.config)
    }
}
