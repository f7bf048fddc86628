//! Two-tier retrieval orchestration.
//!
//! The [`Retriever`] coordinates the semantic tier (query embedding plus
//! cosine ranking over chunks that already carry embeddings) with the
//! lexical tier (BM25 over the full scope). Every external collaborator is
//! independently fault-tolerant: an embedding failure degrades to BM25, a
//! composition failure degrades to the extractive answer. The only terminal
//! outcome is an empty scope.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::bm25::rank_top_k;
use crate::compose::{AnswerComposer, Segment, extractive_answer};
use crate::config::RetrievalConfig;
use crate::document::{Chunk, Citation, ScoredChunk};
use crate::embedding::EmbeddingProvider;
use crate::error::{Result, RetrievalError};

/// Compute cosine similarity between two vectors.
///
/// Operates on the common prefix of the two vectors and guards the
/// denominator with a small epsilon, so zero vectors score 0 rather than
/// dividing by zero.
pub fn cosine_sim(a: &[f32], b: &[f32]) -> f32 {
    let n = a.len().min(b.len());
    let mut dot = 0.0f32;
    let mut na = 0.0f32;
    let mut nb = 0.0f32;
    for i in 0..n {
        dot += a[i] * b[i];
        na += a[i] * a[i];
        nb += b[i] * b[i];
    }
    dot / (na.sqrt() * nb.sqrt() + 1e-9)
}

/// Passages selected for a query, with their citations.
#[derive(Debug, Clone)]
pub struct Retrieval {
    /// Selected chunks, most relevant first.
    pub chunks: Vec<Chunk>,
    /// One citation per selected chunk, in the same order.
    pub citations: Vec<Citation>,
}

/// A composed answer with its citations.
#[derive(Debug, Clone)]
pub struct Answer {
    /// Answer text.
    pub text: String,
    /// Citations backing the answer, in passage order.
    pub citations: Vec<Citation>,
}

/// The retrieval orchestrator.
///
/// Composes an [`EmbeddingProvider`] and an optional [`AnswerComposer`]
/// over a [`RetrievalConfig`]. Construct one via [`Retriever::builder()`].
pub struct Retriever {
    config: RetrievalConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    composer: Option<Arc<dyn AnswerComposer>>,
}

impl Retriever {
    /// Create a new [`RetrieverBuilder`].
    pub fn builder() -> RetrieverBuilder {
        RetrieverBuilder::default()
    }

    /// Return a reference to the configuration.
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Select the passages answering `question` from `scope`.
    ///
    /// Tries the semantic tier first: a query embedding is fetched and the
    /// chunks already carrying embeddings are ranked by cosine similarity
    /// against it. If the embedding fetch fails or no chunk carries an
    /// embedding, falls back to BM25 over the full scope. Both tiers return
    /// at most `top_k` chunks.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::EmptyScope`] when `scope` is empty — the
    /// only terminal no-answer outcome.
    pub async fn retrieve(&self, question: &str, scope: &[Chunk]) -> Result<Retrieval> {
        if scope.is_empty() {
            return Err(RetrievalError::EmptyScope);
        }

        let top = match self.semantic_top(question, scope).await {
            Some(chunks) => chunks,
            None => {
                debug!("no semantic signal, ranking lexically");
                rank_top_k(question, scope, self.config.top_k)
            }
        };

        let citations = top.iter().map(Citation::for_chunk).collect();
        info!(result_count = top.len(), "retrieval completed");
        Ok(Retrieval { chunks: top, citations })
    }

    /// Semantic tier: query embedding plus cosine ranking over the chunks
    /// that carry embeddings.
    ///
    /// Returns `None` when the embedding fetch fails, returns an empty
    /// vector, or no scoped chunk carries an embedding. The failure is
    /// suppressed here; the caller degrades to the lexical tier.
    async fn semantic_top(&self, question: &str, scope: &[Chunk]) -> Option<Vec<Chunk>> {
        let query_embedding = match self.embedder.embed(question).await {
            Ok(v) if !v.is_empty() => v,
            Ok(_) => {
                warn!("embedding provider returned an empty vector");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "semantic retrieval unavailable");
                return None;
            }
        };

        let mut usable: Vec<ScoredChunk> = scope
            .iter()
            .filter(|c| c.has_embedding())
            .map(|c| ScoredChunk {
                score: cosine_sim(c.embedding.as_deref().unwrap_or(&[]), &query_embedding),
                chunk: c.clone(),
            })
            .collect();
        if usable.is_empty() {
            return None;
        }

        usable.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        usable.truncate(self.config.top_k);
        Some(usable.into_iter().map(|s| s.chunk).collect())
    }

    /// Answer `question` from `scope`, with page-level citations.
    ///
    /// Retrieves the top passages, then hands them to the configured
    /// [`AnswerComposer`]. If no composer is configured or composition
    /// fails, the deterministic extractive answer is returned instead, so
    /// a non-empty scope always produces a response.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::EmptyScope`] when `scope` is empty.
    pub async fn answer(
        &self,
        question: &str,
        scope: &[Chunk],
        doc_names: &HashMap<String, String>,
    ) -> Result<Answer> {
        let retrieval = self.retrieve(question, scope).await?;

        let segments: Vec<Segment> = retrieval
            .chunks
            .iter()
            .map(|c| Segment {
                text: c.text.clone(),
                page: c.page,
                doc_name: doc_names.get(&c.doc_id).cloned().unwrap_or_else(|| "doc".to_string()),
            })
            .collect();

        let text = match &self.composer {
            Some(composer) => match composer.compose(question, &segments).await {
                Ok(answer) => answer,
                Err(e) => {
                    warn!(error = %e, "composition failed, using extractive answer");
                    extractive_answer(&segments)
                }
            },
            None => extractive_answer(&segments),
        };

        Ok(Answer { text, citations: retrieval.citations })
    }
}

/// Builder for constructing a [`Retriever`].
///
/// `config` and `embedding_provider` are required; `composer` is optional.
#[derive(Default)]
pub struct RetrieverBuilder {
    config: Option<RetrievalConfig>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    composer: Option<Arc<dyn AnswerComposer>>,
}

impl RetrieverBuilder {
    /// Set the configuration.
    pub fn config(mut self, config: RetrievalConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(provider);
        self
    }

    /// Set an optional answer composer.
    pub fn composer(mut self, composer: Arc<dyn AnswerComposer>) -> Self {
        self.composer = Some(composer);
        self
    }

    /// Build the [`Retriever`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Config`] if a required field is missing.
    pub fn build(self) -> Result<Retriever> {
        let config = self
            .config
            .ok_or_else(|| RetrievalError::Config("config is required".to_string()))?;
        let embedder = self
            .embedder
            .ok_or_else(|| RetrievalError::Config("embedding_provider is required".to_string()))?;

        Ok(Retriever { config, embedder, composer: self.composer })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = [0.6f32, 0.8];
        assert!((cosine_sim(&v, &v) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        assert!(cosine_sim(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-5);
    }

    #[test]
    fn cosine_tolerates_zero_and_mismatched_vectors() {
        assert_eq!(cosine_sim(&[], &[1.0]), 0.0);
        assert_eq!(cosine_sim(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        // Only the common prefix is compared.
        assert!(cosine_sim(&[1.0], &[1.0, 9.9]) > 0.99);
    }
}
