//! Search backend boundary.
//!
//! The storage, indexing, and single-source ranking all belong to an
//! external search engine. This module defines the narrow slice of that
//! engine Rankfuse consumes: two ranked-retrieval calls, one dense and
//! one lexical, each returning hits best-first with a backend-native
//! relevance score. The score is used only to verify ordering at the
//! boundary; the adapters in [`crate::source`] discard it in favor of
//! positional ranks, since raw scores from different engines are not
//! comparable.
//!
//! `InMemorySearchClient` is the in-process fallback used by tests and
//! the demo: brute-force cosine similarity for the dense call, token
//! overlap for the lexical call.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use rankfuse_core::{Error, ItemId, Result};
use serde::{Deserialize, Serialize};

/// One hit from a single backend retrieval, in backend-native terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedHit {
    /// Document identifier.
    pub id: ItemId,

    /// Backend-native relevance score (higher is better). Not comparable
    /// across backends; dropped before fusion.
    pub relevance: f32,
}

/// The external search engine, reduced to two ranked-retrieval calls.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Nearest-neighbor search over the corpus, best-first.
    async fn dense_search(&self, embedding: &[f32], limit: usize) -> Result<Vec<RankedHit>>;

    /// Full-text search over the corpus, best-first.
    async fn text_search(&self, query: &str, limit: usize) -> Result<Vec<RankedHit>>;
}

// ============================================================================
// In-memory client
// ============================================================================

/// A stored document in the in-memory client.
#[derive(Debug, Clone)]
struct StoredDocument {
    text: String,
    embedding: Vec<f32>,
}

/// Brute-force in-memory search client for tests and demos.
#[derive(Debug, Default)]
pub struct InMemorySearchClient {
    documents: RwLock<HashMap<ItemId, StoredDocument>>,
}

impl InMemorySearchClient {
    /// Create an empty client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a document with its pre-computed embedding.
    pub fn insert(&self, id: impl Into<ItemId>, text: impl Into<String>, embedding: Vec<f32>) {
        let mut documents = self.documents.write().unwrap_or_else(|e| e.into_inner());
        documents.insert(
            id.into(),
            StoredDocument {
                text: text.into(),
                embedding,
            },
        );
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Whether the corpus is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn token_overlap(query: &str, text: &str) -> f32 {
    let query_tokens: Vec<String> = query
        .split_whitespace()
        .map(|t| t.to_lowercase())
        .collect();
    if query_tokens.is_empty() {
        return 0.0;
    }

    let text_lower = text.to_lowercase();
    let text_tokens: std::collections::HashSet<&str> = text_lower.split_whitespace().collect();

    query_tokens
        .iter()
        .filter(|t| text_tokens.contains(t.as_str()))
        .count() as f32
}

fn top_hits(mut scored: Vec<RankedHit>, limit: usize) -> Vec<RankedHit> {
    scored.sort_by(|a, b| {
        b.relevance
            .partial_cmp(&a.relevance)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    scored.truncate(limit);
    scored
}

#[async_trait]
impl SearchClient for InMemorySearchClient {
    async fn dense_search(&self, embedding: &[f32], limit: usize) -> Result<Vec<RankedHit>> {
        if embedding.is_empty() {
            return Err(Error::config("query embedding is empty"));
        }

        let documents = self.documents.read().unwrap_or_else(|e| e.into_inner());
        let scored = documents
            .iter()
            .map(|(id, doc)| RankedHit {
                id: id.clone(),
                relevance: cosine_similarity(embedding, &doc.embedding),
            })
            .collect();

        Ok(top_hits(scored, limit))
    }

    async fn text_search(&self, query: &str, limit: usize) -> Result<Vec<RankedHit>> {
        let documents = self.documents.read().unwrap_or_else(|e| e.into_inner());
        // A document matching no query token is not a hit at all.
        let scored = documents
            .iter()
            .filter_map(|(id, doc)| {
                let relevance = token_overlap(query, &doc.text);
                (relevance > 0.0).then(|| RankedHit {
                    id: id.clone(),
                    relevance,
                })
            })
            .collect();

        Ok(top_hits(scored, limit))
    }
}

// ============================================================================
// Tests
// ============================================================================
