//! Answer composition boundary and the extractive fallback.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A retrieved passage prepared for answer composition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    /// Passage text.
    pub text: String,
    /// Source page, 1-based.
    pub page: u32,
    /// Name of the source document.
    pub doc_name: String,
}

/// Composes a natural-language answer from retrieved passages.
///
/// Failure is per-query and non-fatal: the orchestrator falls back to
/// [`extractive_answer`] so the caller always receives a response.
#[async_trait]
pub trait AnswerComposer: Send + Sync {
    /// Compose an answer to `question` grounded in `segments`.
    async fn compose(&self, question: &str, segments: &[Segment]) -> Result<String>;
}

/// Excerpt length used in the extractive fallback, in characters.
const EXCERPT_LEN: usize = 240;

/// Build a deterministic answer directly from the top passages.
///
/// Each segment is rendered as a numbered excerpt with its page number.
pub fn extractive_answer(segments: &[Segment]) -> String {
    let lines: Vec<String> = segments
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let excerpt: String = s.text.chars().take(EXCERPT_LEN).collect();
            format!("• [{}] p.{} — {excerpt}…", i + 1, s.page)
        })
        .collect();
    format!("Here’s what I found:\n\n{}", lines.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(text: &str, page: u32) -> Segment {
        Segment { text: text.to_string(), page, doc_name: "ops.pdf".to_string() }
    }

    #[test]
    fn renders_numbered_excerpts_with_pages() {
        let answer = extractive_answer(&[segment("clean the slicer", 3), segment("log temps", 7)]);
        assert!(answer.starts_with("Here’s what I found:"));
        assert!(answer.contains("[1] p.3 — clean the slicer"));
        assert!(answer.contains("[2] p.7 — log temps"));
    }

    #[test]
    fn long_passages_are_truncated_to_the_excerpt_length() {
        let long = "word ".repeat(100);
        let answer = extractive_answer(&[segment(&long, 1)]);
        let line = answer.lines().last().unwrap();
        // 240 chars of excerpt plus the bullet prefix and ellipsis.
        assert!(line.chars().count() < 260);
    }

    #[test]
    fn no_segments_yields_just_the_header() {
        assert_eq!(extractive_answer(&[]), "Here’s what I found:\n\n");
    }
}
