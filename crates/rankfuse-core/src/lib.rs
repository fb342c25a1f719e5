//! Rankfuse Core — types, errors, configuration, and the fusion algorithm.
//!
//! This crate is the level-0 foundation of Rankfuse: it has no internal
//! dependencies and no I/O. The retrieval adapters and executor live in
//! `rankfuse-retrieval`; transports live above that.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`types`]: Identifiers, candidates, source specs, fused results
//! - [`config`]: Fusion configuration knobs
//! - [`fusion`]: The pure rank-fusion algorithm

pub mod config;
pub mod error;
pub mod fusion;
pub mod types;

// Re-export key types at crate root for convenience
pub use config::FusionConfig;
pub use error::{Error, Result};
pub use fusion::{fuse, reciprocal_rank_score};
pub use types::{
    Candidate, FusedResult, FusionOutcome, ItemId, PartialFailurePolicy, SourceSpec,
};
