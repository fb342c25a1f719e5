//! Result hydration.
//!
//! Fusion works over bare identifiers; hydration swaps them for display
//! documents in one batch fetch. The fused order is authoritative: the
//! store's return order never reorders results. An id the store no longer
//! has is dropped silently, so the hydrated list can be shorter than the
//! fused one. Only a failure of the batch fetch itself is an error.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use rankfuse_core::{FusedResult, ItemId, Result};
use serde::{Deserialize, Serialize};

/// A display document fetched from the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydratedDocument {
    /// Document identifier.
    pub id: ItemId,

    /// Title, if the store carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Plot or summary text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,

    /// Release year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    /// Store-specific fields outside the common projection.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl HydratedDocument {
    /// Create a document with only an id; fields attach via `with_*`.
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            title: None,
            plot: None,
            year: None,
            extra: HashMap::new(),
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the plot text.
    pub fn with_plot(mut self, plot: impl Into<String>) -> Self {
        self.plot = Some(plot.into());
        self
    }

    /// Set the release year.
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }
}

/// One fused result joined with its display document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydratedResult {
    /// The fetched document.
    pub document: HydratedDocument,

    /// Fused score carried over from the fusion step.
    pub combined_score: f32,

    /// Per-source scores carried over from the fusion step.
    pub score_by_source: std::collections::BTreeMap<String, f32>,
}

/// Batch document fetch against the document store.
#[async_trait]
pub trait DocumentHydrator: Send + Sync {
    /// Fetch the documents for `ids` in one call.
    ///
    /// Missing ids are simply absent from the returned map; only a failed
    /// fetch is an error.
    async fn fetch(&self, ids: &[ItemId]) -> Result<HashMap<ItemId, HydratedDocument>>;
}

/// Join fused results with their documents, preserving fused order and
/// dropping results whose document no longer exists.
pub async fn hydrate(
    hydrator: &dyn DocumentHydrator,
    results: &[FusedResult],
) -> Result<Vec<HydratedResult>> {
    if results.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<ItemId> = results.iter().map(|r| r.id.clone()).collect();
    let mut documents = hydrator.fetch(&ids).await?;

    let dropped = ids.len() - documents.len().min(ids.len());
    if dropped > 0 {
        log::debug!("hydration dropped {dropped} results with no backing document");
    }

    Ok(results
        .iter()
        .filter_map(|result| {
            documents.remove(&result.id).map(|document| HydratedResult {
                document,
                combined_score: result.combined_score,
                score_by_source: result.score_by_source.clone(),
            })
        })
        .collect())
}

// ============================================================================
// In-memory hydrator
// ============================================================================

/// Document store backed by a map, for tests and demos.
#[derive(Debug, Default)]
pub struct InMemoryHydrator {
    documents: RwLock<HashMap<ItemId, HydratedDocument>>,
}

impl InMemoryHydrator {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a document.
    pub fn insert(&self, document: HydratedDocument) {
        let mut documents = self.documents.write().unwrap_or_else(|e| e.into_inner());
        documents.insert(document.id.clone(), document);
    }
}

#[async_trait]
impl DocumentHydrator for InMemoryHydrator {
    async fn fetch(&self, ids: &[ItemId]) -> Result<HashMap<ItemId, HydratedDocument>> {
        let documents = self.documents.read().unwrap_or_else(|e| e.into_inner());
        Ok(ids
            .iter()
            .filter_map(|id| documents.get(id).map(|doc| (id.clone(), doc.clone())))
            .collect())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rankfuse_core::Error;
    use std::collections::BTreeMap;

    fn fused(id: &str, score: f32) -> FusedResult {
        FusedResult {
            id: ItemId::new(id),
            score_by_source: BTreeMap::new(),
            combined_score: score,
        }
    }

    fn seeded_store() -> InMemoryHydrator {
        let store = InMemoryHydrator::new();
        store.insert(
            HydratedDocument::new("a")
                .with_title("Alpha")
                .with_plot("first")
                .with_year(1999),
        );
        store.insert(HydratedDocument::new("b").with_title("Beta"));
        store
    }

    #[tokio::test]
    async fn test_hydrate_preserves_fused_order() {
        let store = seeded_store();
        let results = vec![fused("b", 0.9), fused("a", 0.5)];

        let hydrated = hydrate(&store, &results).await.unwrap();
        assert_eq!(hydrated.len(), 2);
        assert_eq!(hydrated[0].document.id, ItemId::new("b"));
        assert_eq!(hydrated[1].document.id, ItemId::new("a"));
        assert_eq!(hydrated[0].combined_score, 0.9);
    }

    #[tokio::test]
    async fn test_hydrate_drops_missing_documents() {
        let store = seeded_store();
        let results = vec![fused("a", 0.8), fused("gone", 0.7), fused("b", 0.6)];

        let hydrated = hydrate(&store, &results).await.unwrap();
        assert_eq!(hydrated.len(), 2);
        assert_eq!(hydrated[0].document.id, ItemId::new("a"));
        assert_eq!(hydrated[1].document.id, ItemId::new("b"));
    }

    #[tokio::test]
    async fn test_hydrate_empty_results() {
        let store = seeded_store();
        let hydrated = hydrate(&store, &[]).await.unwrap();
        assert!(hydrated.is_empty());
    }

    #[tokio::test]
    async fn test_hydrate_fetch_failure_is_an_error() {
        struct FailingHydrator;

        #[async_trait]
        impl DocumentHydrator for FailingHydrator {
            async fn fetch(
                &self,
                _ids: &[ItemId],
            ) -> Result<HashMap<ItemId, HydratedDocument>> {
                Err(Error::hydration("cursor lost"))
            }
        }

        let results = vec![fused("a", 0.5)];
        let err = hydrate(&FailingHydrator, &results).await.unwrap_err();
        assert!(matches!(err, Error::Hydration(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_document_builder_and_serialization() {
        let doc = HydratedDocument::new("m1")
            .with_title("The Movie")
            .with_year(2004);

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["id"], "m1");
        assert_eq!(json["title"], "The Movie");
        assert_eq!(json["year"], 2004);
        // Unset fields are omitted entirely.
        assert!(json.get("plot").is_none());
    }

    #[test]
    fn test_document_extra_fields_flatten() {
        let json = r#"{"id": "m2", "title": "T", "genre": "heist"}"#;
        let doc: HydratedDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.extra["genre"], "heist");
    }
}
