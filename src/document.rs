//! Data types for documents, chunks, citations, and ranked results.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::tagging::Tag;

/// How a document entered the library.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocKind {
    /// Uploaded by an operator at runtime.
    #[default]
    Manual,
    /// Seeded from a preloaded manifest.
    Preloaded,
}

/// A source document and its searchable passages.
///
/// Created on successful or partial ingestion of an uploaded file. A
/// document whose extraction failed is still recorded, with no chunks;
/// [`is_parsed`](Document::is_parsed) distinguishes the two. Immutable once
/// published, except for chunk embeddings being attached afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier for the document.
    pub id: String,
    /// Original file name. Also feeds auto-tagging.
    pub name: String,
    /// Full extracted text, page sentinels included. Empty when extraction failed.
    pub raw_text: String,
    /// Page count reported by the extractor; 0 when unknown.
    pub page_count: u32,
    /// Passages in document order. Empty means the document is unparsed.
    pub chunks: Vec<Chunk>,
    /// Topical labels inferred at ingestion. Never empty.
    pub tags: BTreeSet<Tag>,
    /// How the document entered the library.
    pub kind: DocKind,
}

impl Document {
    /// Whether extraction produced any searchable passages.
    pub fn is_parsed(&self) -> bool {
        !self.chunks.is_empty()
    }
}

/// A bounded passage of a document's text, the unit of retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier for the chunk.
    pub id: String,
    /// Parent document id. A back-reference, not ownership.
    pub doc_id: String,
    /// Inferred source page, 1-based.
    pub page: u32,
    /// Passage text. Never empty.
    pub text: String,
    /// Vector embedding, attached asynchronously after ingestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl Chunk {
    /// Whether a non-empty embedding has been attached.
    pub fn has_embedding(&self) -> bool {
        self.embedding.as_ref().is_some_and(|e| !e.is_empty())
    }
}

/// A `(document, page)` pair identifying an answer's source passage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Citation {
    /// The cited document's id.
    pub doc_id: String,
    /// The cited page, 1-based.
    pub page: u32,
}

impl Citation {
    /// Build the citation for a chunk.
    pub fn for_chunk(chunk: &Chunk) -> Self {
        Self { doc_id: chunk.doc_id.clone(), page: chunk.page }
    }
}

/// A chunk paired with a relevance score. Ephemeral, produced per query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// The scored chunk.
    pub chunk: Chunk,
    /// The relevance score (higher is more relevant).
    pub score: f32,
}
