//! Fusion configuration.
//!
//! [`FusionConfig`] gathers the knobs that used to live in ad-hoc
//! environment variables: result limit, over-request factor, per-source
//! priorities, the partial-failure policy, and the fan-out deadline.
//! Recognized options are enumerated here; the engine itself never reads
//! ambient process state.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::PartialFailurePolicy;

/// Configuration for one hybrid retrieval pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Maximum results after fusion.
    pub final_limit: usize,

    /// Each source is asked for `final_limit * overrequest_factor`
    /// candidates, so fusion has enough breadth to recover items that
    /// rank well on one axis but not the other.
    pub overrequest_factor: usize,

    /// Additive damping for the dense (vector) source.
    pub vector_priority: u32,

    /// Additive damping for the lexical (text) source.
    pub text_priority: u32,

    /// What to do when some sources fail.
    pub partial_failure: PartialFailurePolicy,

    /// Deadline for the whole retrieval fan-out, in milliseconds.
    pub timeout_ms: u64,

    /// Embedding dimension for the vector source's query embedding.
    pub embedding_dimension: usize,

    /// Embedding model name.
    pub embedding_model: String,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            final_limit: 10,
            overrequest_factor: 10,
            vector_priority: 1,
            text_priority: 1,
            partial_failure: PartialFailurePolicy::Tolerate,
            timeout_ms: 30_000,
            embedding_dimension: 1024,
            embedding_model: "voyage-3.5".to_string(),
        }
    }
}

impl FusionConfig {
    /// How many candidates each source should be asked for.
    pub fn candidate_limit(&self) -> usize {
        self.final_limit.saturating_mul(self.overrequest_factor)
    }

    /// Validate configured values that the type system cannot enforce.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for a zero embedding dimension or a zero
    /// over-request factor.
    pub fn validate(&self) -> Result<()> {
        if self.embedding_dimension == 0 {
            return Err(Error::config("embedding_dimension must be positive"));
        }
        if self.overrequest_factor == 0 {
            return Err(Error::config("overrequest_factor must be positive"));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
