//! Retrieval core for an operations-manual Q&A assistant.
//!
//! `opsrag` ingests PDF-extracted documents, splits them into page-tagged
//! passages, classifies them with keyword heuristics, and selects the
//! passages answering a question with a two-tier strategy: semantic
//! (embedding) ranking when chunk embeddings are available, Okapi BM25
//! otherwise. Answers carry page-level citations, and every external
//! collaborator — text extraction, embedding fetch, answer composition —
//! degrades gracefully on failure. Only an empty scope is terminal.
//!
//! The crate is a library with no UI or transport layer; callers bring
//! their own [`TextExtractor`], [`EmbeddingProvider`], and (optionally)
//! [`AnswerComposer`] implementations, or enable the `openai` feature for
//! the bundled [`openai::OpenAiClient`].
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::collections::BTreeSet;
//! use std::sync::Arc;
//!
//! use opsrag::{
//!     DocumentLibrary, RetrievalConfig, Retriever, WordWindowChunker,
//! };
//!
//! let library = DocumentLibrary::new();
//! let chunker = WordWindowChunker::default();
//! library.ingest("haccp_manual.pdf", &bytes, &extractor, &chunker).await;
//!
//! let retriever = Retriever::builder()
//!     .config(RetrievalConfig::default())
//!     .embedding_provider(Arc::new(embedder))
//!     .build()?;
//!
//! let scope = library.scoped_chunks(&BTreeSet::new()).await;
//! let answer = retriever.answer("how often do we calibrate thermometers?",
//!     &scope, &library.names_by_id().await).await?;
//! println!("{}", answer.text);
//! ```

pub mod bm25;
pub mod chunking;
pub mod compose;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod extract;
pub mod library;
#[cfg(feature = "openai")]
pub mod openai;
pub mod retrieval;
pub mod session;
pub mod tagging;
pub mod tokenize;

pub use bm25::{DEFAULT_TOP_K, rank_top_k, score_chunks};
pub use chunking::{Chunker, DEFAULT_WORDS_PER_CHUNK, WordWindowChunker};
pub use compose::{AnswerComposer, Segment, extractive_answer};
pub use config::{RetrievalConfig, RetrievalConfigBuilder};
pub use document::{Chunk, Citation, DocKind, Document, ScoredChunk};
pub use embedding::EmbeddingProvider;
pub use error::{Result, RetrievalError};
pub use extract::{ExtractedText, TextExtractor, page_marker};
pub use library::DocumentLibrary;
#[cfg(feature = "openai")]
pub use openai::OpenAiClient;
pub use retrieval::{Answer, Retrieval, Retriever, RetrieverBuilder, cosine_sim};
pub use session::{Message, Role, Transcript};
pub use tagging::{Tag, auto_tags};
pub use tokenize::tokenize;
