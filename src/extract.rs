//! Text-extraction boundary.
//!
//! PDF parsing itself lives outside the core; implementations of
//! [`TextExtractor`] (pdfium bindings, a remote parsing service, test stubs)
//! plug in here. The contract is that extracted text carries one
//! `[[PAGE n]]` sentinel per source page, in document order, which the
//! chunker later uses to attribute passages to pages.

use async_trait::async_trait;

use crate::error::Result;

/// Extracted document text plus its page count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    /// Full text with one page sentinel per source page.
    pub text: String,
    /// Number of source pages; 0 when the extractor cannot tell.
    pub pages: u32,
}

/// Render the page-boundary sentinel for a page.
///
/// Extractor implementations insert this marker at the start of each page's
/// text; the chunker scans for it when attributing a passage to a page.
pub fn page_marker(page: u32) -> String {
    format!("[[PAGE {page}]]")
}

/// Extracts searchable text from a document's raw bytes.
///
/// Failure is per-document and non-fatal: the library records the document
/// unparsed and moves on.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract the full text and page count of `bytes`.
    ///
    /// The returned text must contain one [`page_marker`] sentinel per
    /// source page, in document order.
    async fn extract(&self, name: &str, bytes: &[u8]) -> Result<ExtractedText>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_format_is_stable() {
        assert_eq!(page_marker(1), "[[PAGE 1]]");
        assert_eq!(page_marker(42), "[[PAGE 42]]");
    }
}
