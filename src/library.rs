//! The shared document library.
//!
//! The library is the only genuinely shared mutable resource in the core:
//! a growing, insertion-ordered collection of [`Document`]s behind a
//! `tokio::sync::RwLock`. Writes (publishing an ingested document, attaching
//! an embedding) go through the single write lock; readers take consistent
//! snapshots. Chunking for different documents shares no state, so
//! ingestion of multiple uploads can proceed concurrently — each document's
//! chunks are private until published here.

use std::collections::{BTreeSet, HashMap};

use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::chunking::Chunker;
use crate::document::{Chunk, DocKind, Document};
use crate::extract::TextExtractor;
use crate::tagging::{Tag, auto_tags};

/// An in-memory, insertion-ordered library of ingested documents.
#[derive(Debug, Default)]
pub struct DocumentLibrary {
    docs: RwLock<Vec<Document>>,
}

impl DocumentLibrary {
    /// Create an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest one uploaded file: extract, chunk, auto-tag, publish.
    ///
    /// Extraction failure is tolerated: the document is still recorded,
    /// with no chunks and a zero page count, and tagged from its name
    /// alone. One document's failure never affects other ingestions.
    pub async fn ingest(
        &self,
        name: &str,
        bytes: &[u8],
        extractor: &dyn TextExtractor,
        chunker: &dyn Chunker,
    ) -> Document {
        let doc_id = Uuid::new_v4().to_string();

        let (raw_text, page_count, chunks) = match extractor.extract(name, bytes).await {
            Ok(extracted) => {
                let chunks = chunker.chunk(&doc_id, &extracted);
                (extracted.text, extracted.pages, chunks)
            }
            Err(e) => {
                warn!(document = name, error = %e, "text extraction skipped, recording unparsed");
                (String::new(), 0, Vec::new())
            }
        };

        let doc = Document {
            id: doc_id,
            name: name.to_string(),
            tags: auto_tags(name, &raw_text),
            raw_text,
            page_count,
            chunks,
            kind: DocKind::Manual,
        };
        info!(
            document.id = %doc.id,
            document.name = name,
            chunk_count = doc.chunks.len(),
            pages = doc.page_count,
            "ingested document"
        );

        self.docs.write().await.push(doc.clone());
        doc
    }

    /// Publish a pre-built document (e.g. from a preloaded manifest).
    pub async fn insert(&self, document: Document) {
        self.docs.write().await.push(document);
    }

    /// Chunks of every document matching the tag selection.
    ///
    /// An empty selection scopes every document; otherwise a document is in
    /// scope when it carries any selected tag. Recomputed from the current
    /// library on every call — scope is never cached across queries.
    pub async fn scoped_chunks(&self, selected: &BTreeSet<Tag>) -> Vec<Chunk> {
        let docs = self.docs.read().await;
        docs.iter()
            .filter(|d| selected.is_empty() || d.tags.iter().any(|t| selected.contains(t)))
            .flat_map(|d| d.chunks.iter().cloned())
            .collect()
    }

    /// Attach an embedding to a chunk by id.
    ///
    /// A targeted in-place update; the surrounding chunk sequence is never
    /// restructured. Returns `false` when no chunk has that id.
    pub async fn attach_embedding(&self, chunk_id: &str, embedding: Vec<f32>) -> bool {
        let mut docs = self.docs.write().await;
        for doc in docs.iter_mut() {
            if let Some(chunk) = doc.chunks.iter_mut().find(|c| c.id == chunk_id) {
                chunk.embedding = Some(embedding);
                return true;
            }
        }
        warn!(chunk.id = chunk_id, "embedding attachment skipped, unknown chunk id");
        false
    }

    /// Look up a document by id.
    pub async fn get(&self, doc_id: &str) -> Option<Document> {
        self.docs.read().await.iter().find(|d| d.id == doc_id).cloned()
    }

    /// Snapshot of all documents in insertion order.
    pub async fn documents(&self) -> Vec<Document> {
        self.docs.read().await.clone()
    }

    /// Document names by id, for citation rendering.
    pub async fn names_by_id(&self) -> HashMap<String, String> {
        self.docs.read().await.iter().map(|d| (d.id.clone(), d.name.clone())).collect()
    }

    /// Number of documents in the library.
    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    /// Whether the library holds no documents.
    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }
}
