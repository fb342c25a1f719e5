//! Common types for rank-fusion retrieval.
//!
//! These types flow between the source adapters, the fusion algorithm,
//! and the hydration step. They are deliberately backend-agnostic: a
//! candidate carries only an identifier and its position in the emitting
//! source's own ranking, never a backend-native relevance score. Raw
//! scores from different engines are not comparable; positions are.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

/// Opaque document identifier, stable across all sources in one query.
///
/// Identity, not content, drives deduplication: two candidates with the
/// same `ItemId` are the same document regardless of which source ranked
/// them. The `Ord` impl doubles as the deterministic tie-break key for
/// equal fused scores.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create an item id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ============================================================================
// Candidates
// ============================================================================

/// One retrieved item plus its zero-based position in one source's ranking.
///
/// Produced by a ranked source adapter; immutable; scoped to a single
/// retrieval call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Document identifier.
    pub id: ItemId,

    /// Zero-based rank within the emitting source's own ordering.
    pub rank: usize,
}

impl Candidate {
    /// Create a candidate at the given rank.
    pub fn new(id: impl Into<ItemId>, rank: usize) -> Self {
        Self {
            id: id.into(),
            rank,
        }
    }
}

// ============================================================================
// Source specification
// ============================================================================

/// Per-source fusion configuration supplied by the caller.
///
/// `priority` is an additive rank-origin shift applied before reciprocal
/// scoring: a candidate at rank `r` from a source with priority `p` scores
/// `1 / (r + p + 1)`. Larger priority means a smaller boost. It is not a
/// weight multiplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    /// Unique source name; the join key for per-source scores.
    pub name: String,

    /// Additive damping term (non-negative).
    #[serde(default)]
    pub priority: u32,
}

impl SourceSpec {
    /// Create a source spec with priority 0.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority: 0,
        }
    }

    /// Set the priority.
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }
}

// ============================================================================
// Fused results
// ============================================================================

/// One item's fused score across all sources.
///
/// Constructed fresh per fusion call, immutable once emitted, never
/// persisted. `score_by_source` uses a `BTreeMap` so serialized output
/// is byte-stable for identical inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedResult {
    /// Document identifier.
    pub id: ItemId,

    /// Per-source reciprocal-rank scores; a missing key means the item
    /// was absent from that source (contributing 0, not a penalty).
    pub score_by_source: BTreeMap<String, f32>,

    /// Sum of per-source scores.
    pub combined_score: f32,
}

impl FusedResult {
    /// The score this item received from a named source, if present there.
    pub fn source_score(&self, source: &str) -> Option<f32> {
        self.score_by_source.get(source).copied()
    }
}

/// The full outcome of a hybrid retrieval call.
///
/// `sources_unavailable` lets a tolerate-mode caller distinguish "no
/// matches" from "a source was down": it lists every source whose adapter
/// failed and was excluded from fusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionOutcome {
    /// Fused results, best first.
    pub results: Vec<FusedResult>,

    /// Names of sources that failed and contributed nothing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources_unavailable: Vec<String>,
}

impl FusionOutcome {
    /// Whether every configured source contributed.
    pub fn is_complete(&self) -> bool {
        self.sources_unavailable.is_empty()
    }
}

// ============================================================================
// Partial-failure policy
// ============================================================================

/// What to do when some, but not all, sources fail.
///
/// The two behaviors are otherwise indistinguishable to a caller, so the
/// choice is an explicit configuration knob rather than an implicit one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartialFailurePolicy {
    /// Fuse using the surviving sources; fail only if all sources fail.
    #[default]
    Tolerate,

    /// Any source failure aborts the whole request.
    Strict,
}

// ============================================================================
// Tests
// ============================================================================
