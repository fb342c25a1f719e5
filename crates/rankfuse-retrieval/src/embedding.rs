//! Embedding provider trait and mock implementation.
//!
//! The vector source needs a fixed-dimension embedding of the query
//! string before it can ask the search backend for nearest neighbors.
//! This module defines the `EmbeddingProvider` trait that abstracts over
//! embedding services, plus a deterministic mock for tests.
//!
//! # Providers
//!
//! - `MockEmbeddingProvider`: deterministic fixed-dimension vectors for testing
//! - [`VoyageEmbeddingProvider`](crate::voyage::VoyageEmbeddingProvider): remote HTTP service

use async_trait::async_trait;
use rankfuse_core::Result;

/// Trait for generating text embeddings.
///
/// Implementations wrap a specific embedding service and provide a
/// uniform async interface. `Send + Sync` so providers can be shared
/// across concurrent retrieval tasks.
///
/// A provider failure surfaces from the vector source as a retrieval
/// error for that source; it never aborts the lexical source.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for several texts, in order.
    ///
    /// The default issues one `embed` call per text; providers whose API
    /// accepts multiple inputs should override this with a single call.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }

    /// The embedding dimension.
    fn dimension(&self) -> usize;

    /// The provider name for diagnostics.
    fn name(&self) -> &str;
}

/// A mock embedding provider for testing.
///
/// Derives each vector component from a rolling hash of the input, so
/// equal texts always map to equal vectors and different texts almost
/// never collide. Output is unit-normalized.
pub struct MockEmbeddingProvider {
    dimension: usize,
}

impl MockEmbeddingProvider {
    /// Create a new mock provider with the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn deterministic_embedding(&self, text: &str) -> Vec<f32> {
        let mut state: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in text.bytes() {
            state ^= u64::from(byte);
            state = state.wrapping_mul(0x1000_0000_01b3);
        }

        let mut embedding = Vec::with_capacity(self.dimension);
        for _ in 0..self.dimension {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            // Map to [-1, 1).
            embedding.push((state as i64 as f32) / (i64::MAX as f32));
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for val in &mut embedding {
                *val /= norm;
            }
        }

        embedding
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.deterministic_embedding(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_provider_creation() {
        let provider = MockEmbeddingProvider::new(1024);
        assert_eq!(provider.dimension(), 1024);
        assert_eq!(provider.name(), "mock");
    }

    #[tokio::test]
    async fn test_mock_embed_dimension_and_norm() {
        let provider = MockEmbeddingProvider::new(8);
        let embedding = provider.embed("superhero movies").await.unwrap();

        assert_eq!(embedding.len(), 8);
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_mock_embed_deterministic() {
        let provider = MockEmbeddingProvider::new(16);
        let e1 = provider.embed("same query").await.unwrap();
        let e2 = provider.embed("same query").await.unwrap();

        assert_eq!(e1, e2);
    }

    #[tokio::test]
    async fn test_mock_embed_varies_with_input() {
        let provider = MockEmbeddingProvider::new(16);
        let e1 = provider.embed("query one").await.unwrap();
        let e2 = provider.embed("query two").await.unwrap();

        assert_ne!(e1, e2);
    }

    #[tokio::test]
    async fn test_embed_batch_default_matches_singles() {
        let provider = MockEmbeddingProvider::new(8);
        let texts = vec!["one".to_string(), "two".to_string()];

        let batch = provider.embed_batch(&texts).await.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], provider.embed("one").await.unwrap());
        assert_eq!(batch[1], provider.embed("two").await.unwrap());
    }

    #[tokio::test]
    async fn test_mock_embed_empty_text() {
        let provider = MockEmbeddingProvider::new(4);
        let embedding = provider.embed("").await.unwrap();
        assert_eq!(embedding.len(), 4);
    }

    #[test]
    fn test_trait_object_safety() {
        fn _assert_object_safe(_: &dyn EmbeddingProvider) {}
    }
}
