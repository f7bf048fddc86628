//! Document chunking with page inference.
//!
//! This module provides the [`Chunker`] trait and its production
//! implementation, [`WordWindowChunker`], which splits extracted text into
//! fixed-size word windows and attributes each window to a source page via
//! the extractor's `[[PAGE n]]` sentinels.

use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use crate::document::Chunk;
use crate::extract::ExtractedText;

/// Default window size, in words.
pub const DEFAULT_WORDS_PER_CHUNK: usize = 350;

/// Matches a page sentinel and captures its page number.
static PAGE_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[PAGE (\d+)\]\]").unwrap());

/// A strategy for splitting extracted text into chunks.
///
/// Implementations produce [`Chunk`]s with text and a page but no
/// embeddings; embeddings are attached later, by chunk id.
pub trait Chunker: Send + Sync {
    /// Split extracted text into chunks belonging to `doc_id`.
    ///
    /// Returns an empty `Vec` for empty text. Every returned chunk has a
    /// fresh unique id and no embedding.
    fn chunk(&self, doc_id: &str, extracted: &ExtractedText) -> Vec<Chunk>;
}

/// Splits text into consecutive windows of a fixed word count.
///
/// The split is by word count alone; window boundaries do not respect
/// sentence or page boundaries. The last window may be shorter. Each
/// window's page is the number of the last `[[PAGE n]]` sentinel occurring
/// inside it; windows without a sentinel (before the first marker, or when
/// the extractor produced none) get a page interpolated from their position:
/// `max(1, round((index + 1) / windows * pages))`, defaulting to 1 when the
/// page count is unknown.
///
/// # Example
///
/// ```rust,ignore
/// use opsrag::{ExtractedText, Chunker, WordWindowChunker};
///
/// let chunker = WordWindowChunker::default();
/// let chunks = chunker.chunk("doc_1", &extracted);
/// ```
#[derive(Debug, Clone)]
pub struct WordWindowChunker {
    words_per_chunk: usize,
}

impl WordWindowChunker {
    /// Create a chunker with the given window size in words.
    ///
    /// A window size of 0 is clamped to 1.
    pub fn new(words_per_chunk: usize) -> Self {
        Self { words_per_chunk: words_per_chunk.max(1) }
    }
}

impl Default for WordWindowChunker {
    fn default() -> Self {
        Self::new(DEFAULT_WORDS_PER_CHUNK)
    }
}

/// Page of the last sentinel in `window`, if any.
fn last_marker_page(window: &str) -> Option<u32> {
    PAGE_MARKER_RE
        .captures_iter(window)
        .last()
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Interpolated page for a window with no sentinel.
fn interpolated_page(index: usize, windows: usize, pages: u32) -> u32 {
    if pages == 0 {
        return 1;
    }
    let estimate = ((index + 1) as f64 / windows as f64 * f64::from(pages)).round() as u32;
    estimate.max(1)
}

impl Chunker for WordWindowChunker {
    fn chunk(&self, doc_id: &str, extracted: &ExtractedText) -> Vec<Chunk> {
        let words: Vec<&str> = extracted.text.split_whitespace().collect();
        if words.is_empty() {
            return Vec::new();
        }

        let windows: Vec<String> =
            words.chunks(self.words_per_chunk).map(|w| w.join(" ")).collect();
        let total = windows.len();

        windows
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let page = last_marker_page(&text)
                    .unwrap_or_else(|| interpolated_page(i, total, extracted.pages));
                Chunk {
                    id: Uuid::new_v4().to_string(),
                    doc_id: doc_id.to_string(),
                    page,
                    text,
                    embedding: None,
                }
            })
            .collect()
    }
}
