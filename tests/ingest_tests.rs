//! End-to-end ingestion and library behavior: extract → chunk → tag →
//! publish, then query with citations.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use opsrag::{
    Chunk, DocumentLibrary, EmbeddingProvider, ExtractedText, Result, RetrievalConfig,
    RetrievalError, Retriever, Tag, TextExtractor, WordWindowChunker, page_marker,
};

/// Serves canned extraction results keyed by document name.
struct StubExtractor {
    texts: HashMap<String, ExtractedText>,
}

impl StubExtractor {
    fn new() -> Self {
        Self { texts: HashMap::new() }
    }

    fn with(mut self, name: &str, text: ExtractedText) -> Self {
        self.texts.insert(name.to_string(), text);
        self
    }
}

#[async_trait]
impl TextExtractor for StubExtractor {
    async fn extract(&self, name: &str, _bytes: &[u8]) -> Result<ExtractedText> {
        self.texts.get(name).cloned().ok_or_else(|| RetrievalError::Extraction {
            name: name.to_string(),
            message: "corrupt file".to_string(),
        })
    }
}

struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(RetrievalError::Semantic {
            provider: "stub".to_string(),
            message: "offline".to_string(),
        })
    }
}

/// A two-page document: page 1 is filler, page 2 talks about cherries.
fn two_page_text() -> ExtractedText {
    let filler = (0..348).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ");
    let text = format!(
        "{} {filler} {} cherry date elderberry compote prep",
        page_marker(1),
        page_marker(2),
    );
    ExtractedText { text, pages: 2 }
}

#[tokio::test]
async fn ingest_then_query_cites_the_right_page() {
    let library = DocumentLibrary::new();
    let extractor = StubExtractor::new().with("fruit_prep.pdf", two_page_text());
    let chunker = WordWindowChunker::default();

    let doc = library.ingest("fruit_prep.pdf", b"%PDF", &extractor, &chunker).await;
    assert!(doc.is_parsed());
    assert_eq!(doc.page_count, 2);
    assert_eq!(doc.chunks.len(), 2);

    let retriever = Retriever::builder()
        .config(RetrievalConfig::default())
        .embedding_provider(Arc::new(FailingEmbedder))
        .build()
        .unwrap();

    let scope = library.scoped_chunks(&BTreeSet::new()).await;
    let retrieval = retriever.retrieve("cherry", &scope).await.unwrap();
    assert_eq!(retrieval.chunks[0].page, 2);
    assert_eq!(retrieval.citations[0].page, 2);
    assert_eq!(retrieval.citations[0].doc_id, doc.id);
}

#[tokio::test]
async fn extraction_failure_records_an_unparsed_document() {
    let library = DocumentLibrary::new();
    let extractor = StubExtractor::new(); // knows no documents
    let chunker = WordWindowChunker::default();

    let doc = library.ingest("HACCP_cooling_log.pdf", b"%PDF", &extractor, &chunker).await;
    assert!(!doc.is_parsed());
    assert_eq!(doc.page_count, 0);
    // Tagged from the name alone.
    assert!(doc.tags.contains(&Tag::Haccp));
    assert!(doc.tags.contains(&Tag::Forms));
    // Still recorded in the library.
    assert_eq!(library.len().await, 1);
}

#[tokio::test]
async fn one_failed_document_does_not_affect_others() {
    let library = DocumentLibrary::new();
    let extractor = StubExtractor::new().with(
        "good.pdf",
        ExtractedText { text: format!("{} oven cleaning steps", page_marker(1)), pages: 1 },
    );
    let chunker = WordWindowChunker::default();

    library.ingest("bad.pdf", b"%PDF", &extractor, &chunker).await;
    let good = library.ingest("good.pdf", b"%PDF", &extractor, &chunker).await;

    assert_eq!(library.len().await, 2);
    assert!(good.is_parsed());
    let scope = library.scoped_chunks(&BTreeSet::new()).await;
    assert_eq!(scope.len(), 1);
    assert_eq!(scope[0].doc_id, good.id);
}

#[tokio::test]
async fn scope_filters_by_selected_tags() {
    let library = DocumentLibrary::new();
    let extractor = StubExtractor::new()
        .with(
            "turkey_recipe.pdf",
            ExtractedText {
                text: format!("{} turkey portion yield ingredients", page_marker(1)),
                pages: 1,
            },
        )
        .with(
            "vendor_orders.pdf",
            ExtractedText {
                text: format!("{} weekly supplier order par levels", page_marker(1)),
                pages: 1,
            },
        );
    let chunker = WordWindowChunker::default();

    let recipe = library.ingest("turkey_recipe.pdf", b"%PDF", &extractor, &chunker).await;
    library.ingest("vendor_orders.pdf", b"%PDF", &extractor, &chunker).await;

    let selected = BTreeSet::from([Tag::Recipe]);
    let scope = library.scoped_chunks(&selected).await;
    assert!(!scope.is_empty());
    assert!(scope.iter().all(|c| c.doc_id == recipe.id));

    // Empty selection scopes everything.
    let all = library.scoped_chunks(&BTreeSet::new()).await;
    assert!(all.len() > scope.len());
}

#[tokio::test]
async fn scope_reflects_documents_ingested_after_a_query() {
    let library = DocumentLibrary::new();
    let extractor = StubExtractor::new()
        .with("a.pdf", ExtractedText { text: format!("{} alpha", page_marker(1)), pages: 1 })
        .with("b.pdf", ExtractedText { text: format!("{} beta", page_marker(1)), pages: 1 });
    let chunker = WordWindowChunker::default();

    library.ingest("a.pdf", b"%PDF", &extractor, &chunker).await;
    let before = library.scoped_chunks(&BTreeSet::new()).await.len();

    library.ingest("b.pdf", b"%PDF", &extractor, &chunker).await;
    let after = library.scoped_chunks(&BTreeSet::new()).await.len();
    assert_eq!(after, before + 1);
}

#[tokio::test]
async fn embedding_attachment_is_targeted_by_chunk_id() {
    let library = DocumentLibrary::new();
    let extractor = StubExtractor::new().with(
        "doc.pdf",
        ExtractedText { text: format!("{} sanitizer mixing chart", page_marker(1)), pages: 1 },
    );
    let chunker = WordWindowChunker::default();

    let doc = library.ingest("doc.pdf", b"%PDF", &extractor, &chunker).await;
    let chunk_id = doc.chunks[0].id.clone();

    assert!(library.attach_embedding(&chunk_id, vec![0.1, 0.2]).await);
    assert!(!library.attach_embedding("no-such-chunk", vec![0.3]).await);

    let stored: Vec<Chunk> = library.scoped_chunks(&BTreeSet::new()).await;
    assert_eq!(stored[0].embedding.as_deref(), Some([0.1, 0.2].as_slice()));
}

#[tokio::test]
async fn preloaded_documents_can_be_inserted_directly() {
    use opsrag::{DocKind, Document};

    let library = DocumentLibrary::new();
    let doc = Document {
        id: "preloaded_1".to_string(),
        name: "brand_standards.pdf".to_string(),
        raw_text: format!("{} uniform and station standards", page_marker(1)),
        page_count: 1,
        chunks: vec![Chunk {
            id: "preloaded_1_0".to_string(),
            doc_id: "preloaded_1".to_string(),
            page: 1,
            text: "uniform and station standards".to_string(),
            embedding: None,
        }],
        tags: BTreeSet::from([Tag::OpsManual]),
        kind: DocKind::Preloaded,
    };
    library.insert(doc).await;

    let fetched = library.get("preloaded_1").await.unwrap();
    assert_eq!(fetched.kind, DocKind::Preloaded);
    assert!(library.get("missing").await.is_none());
    assert_eq!(library.scoped_chunks(&BTreeSet::new()).await.len(), 1);
}

#[tokio::test]
async fn answer_over_the_library_names_documents_in_citations() {
    let library = DocumentLibrary::new();
    let extractor = StubExtractor::new().with("fruit_prep.pdf", two_page_text());
    let chunker = WordWindowChunker::default();
    let doc = library.ingest("fruit_prep.pdf", b"%PDF", &extractor, &chunker).await;

    let retriever = Retriever::builder()
        .config(RetrievalConfig::default())
        .embedding_provider(Arc::new(FailingEmbedder))
        .build()
        .unwrap();

    let scope = library.scoped_chunks(&BTreeSet::new()).await;
    let names = library.names_by_id().await;
    assert_eq!(names.get(&doc.id).map(String::as_str), Some("fruit_prep.pdf"));

    let answer = retriever.answer("cherry compote", &scope, &names).await.unwrap();
    assert!(answer.text.contains("p.2"));
    assert_eq!(answer.citations[0].doc_id, doc.id);
}
