//! Ranked source adapters.
//!
//! A `RankedSource` turns one backend retrieval strategy into the shape
//! fusion consumes: an ordered list of [`Candidate`]s carrying zero-based
//! ranks. The adapter owns the strategy-specific plumbing (embedding the
//! query for the dense path, passing it through for the lexical path) and
//! strips backend-native scores at this boundary.

use std::sync::Arc;

use async_trait::async_trait;
use rankfuse_core::{Candidate, Result};

use crate::client::SearchClient;
use crate::embedding::EmbeddingProvider;

/// One retrieval strategy producing an ordered candidate list.
///
/// `limit` is the overrequested candidate depth, not the caller's final
/// limit. Implementations return at most `limit` candidates with ranks
/// `0..n` in emission order, and may return fewer or none.
#[async_trait]
pub trait RankedSource: Send + Sync {
    /// Retrieve up to `limit` candidates for `query`, best first.
    async fn retrieve(&self, query: &str, limit: usize) -> Result<Vec<Candidate>>;

    /// The source name, matching the `SourceSpec` it is fused under.
    fn name(&self) -> &str;
}

fn to_candidates(hits: Vec<crate::client::RankedHit>, limit: usize) -> Vec<Candidate> {
    hits.into_iter()
        .take(limit)
        .enumerate()
        .map(|(rank, hit)| Candidate { id: hit.id, rank })
        .collect()
}

// ============================================================================
// Vector source
// ============================================================================

/// Dense retrieval: embed the query, then nearest-neighbor search.
pub struct VectorSource {
    name: String,
    embedder: Arc<dyn EmbeddingProvider>,
    client: Arc<dyn SearchClient>,
}

impl VectorSource {
    /// Create a vector source named `name`.
    pub fn new(
        name: impl Into<String>,
        embedder: Arc<dyn EmbeddingProvider>,
        client: Arc<dyn SearchClient>,
    ) -> Self {
        Self {
            name: name.into(),
            embedder,
            client,
        }
    }
}

#[async_trait]
impl RankedSource for VectorSource {
    async fn retrieve(&self, query: &str, limit: usize) -> Result<Vec<Candidate>> {
        let embedding = self.embedder.embed(query).await?;
        let hits = self.client.dense_search(&embedding, limit).await?;

        log::debug!(
            "source '{}' returned {} candidates (limit {})",
            self.name,
            hits.len(),
            limit
        );
        Ok(to_candidates(hits, limit))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// Lexical source
// ============================================================================

/// Lexical retrieval: full-text search on the raw query string.
pub struct LexicalSource {
    name: String,
    client: Arc<dyn SearchClient>,
}

impl LexicalSource {
    /// Create a lexical source named `name`.
    pub fn new(name: impl Into<String>, client: Arc<dyn SearchClient>) -> Self {
        Self {
            name: name.into(),
            client,
        }
    }
}

#[async_trait]
impl RankedSource for LexicalSource {
    async fn retrieve(&self, query: &str, limit: usize) -> Result<Vec<Candidate>> {
        let hits = self.client.text_search(query, limit).await?;

        log::debug!(
            "source '{}' returned {} candidates (limit {})",
            self.name,
            hits.len(),
            limit
        );
        Ok(to_candidates(hits, limit))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// Tests
// ============================================================================
