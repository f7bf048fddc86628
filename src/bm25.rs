//! Okapi BM25 lexical ranking over chunks.
//!
//! This is the lexical tier of retrieval: it needs no embeddings, no index
//! build step, and no shared state. Scoring is pure and re-entrant, so
//! concurrent queries against a stable chunk set require no locking.

use std::collections::{HashMap, HashSet};
use std::cmp::Ordering;

use crate::document::{Chunk, ScoredChunk};
use crate::tokenize::tokenize;

/// Term-frequency saturation parameter.
pub const K1: f32 = 1.5;
/// Length-normalization parameter.
pub const B: f32 = 0.75;
/// Default number of passages returned per query.
pub const DEFAULT_TOP_K: usize = 6;

/// Score every chunk against `query` with Okapi BM25.
///
/// Uses `idf(t) = ln((N - df(t) + 0.5) / (df(t) + 0.5) + 1)` with
/// `N = max(|chunks|, 1)`, unclamped. A chunk containing none of the query
/// tokens scores 0; query tokens absent from a chunk contribute nothing.
/// Output order matches input order.
pub fn score_chunks(query: &str, chunks: &[Chunk]) -> Vec<ScoredChunk> {
    let q_tokens = tokenize(query);
    let n = chunks.len().max(1) as f32;

    let doc_tokens: Vec<Vec<String>> = chunks.iter().map(|c| tokenize(&c.text)).collect();
    let doc_len: Vec<f32> = doc_tokens.iter().map(|toks| toks.len() as f32).collect();
    let avgdl = doc_len.iter().sum::<f32>() / n;

    // Document frequency: each chunk counts once per distinct token.
    let mut df: HashMap<&str, u32> = HashMap::new();
    for toks in &doc_tokens {
        let mut seen: HashSet<&str> = HashSet::new();
        for t in toks {
            if seen.insert(t.as_str()) {
                *df.entry(t.as_str()).or_insert(0) += 1;
            }
        }
    }
    let idf = |t: &str| {
        let d = df.get(t).copied().unwrap_or(0) as f32;
        ((n - d + 0.5) / (d + 0.5) + 1.0).ln()
    };

    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            let mut tf: HashMap<&str, f32> = HashMap::new();
            for t in &doc_tokens[i] {
                *tf.entry(t.as_str()).or_insert(0.0) += 1.0;
            }
            let norm = if avgdl > 0.0 { avgdl } else { 1.0 };
            let mut score = 0.0;
            for qt in &q_tokens {
                let f = tf.get(qt.as_str()).copied().unwrap_or(0.0);
                if f == 0.0 {
                    continue;
                }
                score +=
                    idf(qt.as_str()) * f * (K1 + 1.0) / (f + K1 * (1.0 - B + B * doc_len[i] / norm));
            }
            ScoredChunk { chunk: chunk.clone(), score }
        })
        .collect()
}

/// Rank `chunks` against `query` and return the top `k` by BM25 score.
///
/// The sort is stable and descending, so equal scores keep their input
/// order. Never returns more than `min(k, chunks.len())` results; scores
/// are dropped at this boundary.
pub fn rank_top_k(query: &str, chunks: &[Chunk], k: usize) -> Vec<Chunk> {
    let mut scored = score_chunks(query, chunks);
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(k);
    scored.into_iter().map(|s| s.chunk).collect()
}
