//! Rankfuse Retrieval — source adapters, hydration, and the fusion executor.
//!
//! This crate is the I/O layer over `rankfuse-core`: it talks to the
//! external search engine and the embedding service, turns their answers
//! into ranked candidate lists, and drives the concurrent fan-out that
//! feeds the pure fusion algorithm.
//!
//! # Modules
//!
//! - [`client`]: The external search engine boundary
//! - [`embedding`]: Embedding provider trait and mock
//! - [`voyage`]: Voyage AI embedding provider
//! - [`source`]: Ranked source adapters (dense and lexical)
//! - [`retry`]: Retry wrapper for flaky sources
//! - [`hydrate`]: Batch hydration of fused results
//! - [`executor`]: End-to-end hybrid retrieval

pub mod client;
pub mod embedding;
pub mod executor;
pub mod hydrate;
pub mod retry;
pub mod source;
pub mod voyage;

pub use client::{InMemorySearchClient, RankedHit, SearchClient};
pub use embedding::{EmbeddingProvider, MockEmbeddingProvider};
pub use executor::{FusionExecutor, HydratedOutcome};
pub use hydrate::{DocumentHydrator, HydratedDocument, HydratedResult, InMemoryHydrator};
pub use retry::RetrySource;
pub use source::{LexicalSource, RankedSource, VectorSource};
pub use voyage::VoyageEmbeddingProvider;
