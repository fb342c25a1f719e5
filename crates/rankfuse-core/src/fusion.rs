//! Rank fusion: merge independently ranked candidate lists into one ranking.
//!
//! Each source contributes a reciprocal-rank score per candidate:
//!
//! ```text
//! score(candidate, priority) = 1 / (candidate.rank + priority + 1)
//! ```
//!
//! Scores are summed across sources (an absent source contributes 0),
//! results are sorted by combined score descending with ties broken by
//! `ItemId` ascending, and the list is truncated to `final_limit`.
//!
//! The priority term is an additive rank-origin shift, not the shared
//! constant `k` of the classic RRF formulation and not a multiplicative
//! weight. Rank 0 with priority 0 scores 1.0; rank 0 with priority 1
//! scores 0.5. It lets a caller dampen one source's contribution without
//! discarding it.
//!
//! The computation is pure and synchronous over already-materialized
//! lists: no I/O, no shared state, safe to call from any number of tasks.

use std::collections::{BTreeMap, HashMap, HashSet};

use log::debug;

use crate::error::{Error, Result};
use crate::types::{Candidate, FusedResult, ItemId, SourceSpec};

/// Reciprocal-rank score for one candidate under a source's priority.
///
/// Monotonically decreasing in both `rank` and `priority`.
pub fn reciprocal_rank_score(rank: usize, priority: u32) -> f32 {
    1.0 / (rank as f32 + priority as f32 + 1.0)
}

/// Fuse ranked candidate lists from multiple sources into one ordering.
///
/// # Arguments
///
/// * `inputs` - One `(SourceSpec, candidates)` pair per source. Candidate
///   lists must already be ordered best-first by their own source; the
///   fusion never re-ranks within a source.
/// * `final_limit` - Maximum results to return. Zero yields an empty list,
///   not an error.
///
/// # Errors
///
/// Returns `Error::Config` if two sources share a name: names are the
/// join key for per-source scores and must be unique per call.
///
/// # Guarantees
///
/// * Every returned id appears in at least one input list.
/// * No id appears twice in the output.
/// * Combined scores are non-increasing down the output.
/// * Equal scores are ordered by id ascending, so the output is fully
///   deterministic regardless of input arrival order.
pub fn fuse(
    inputs: &[(SourceSpec, Vec<Candidate>)],
    final_limit: usize,
) -> Result<Vec<FusedResult>> {
    let mut seen_names = HashSet::new();
    for (spec, _) in inputs {
        if !seen_names.insert(spec.name.as_str()) {
            return Err(Error::config(format!(
                "duplicate source name '{}'",
                spec.name
            )));
        }
    }

    if final_limit == 0 {
        return Ok(Vec::new());
    }

    // Per-item, per-source scores. An item absent from a source simply has
    // no entry for it; it is never assigned a default score.
    let mut by_item: HashMap<ItemId, BTreeMap<String, f32>> = HashMap::new();

    for (spec, candidates) in inputs {
        for candidate in candidates {
            let score = reciprocal_rank_score(candidate.rank, spec.priority);
            let scores = by_item.entry(candidate.id.clone()).or_default();

            // Rank uniqueness should make duplicates within one source
            // impossible; if a backend misbehaves, keep the best score.
            scores
                .entry(spec.name.clone())
                .and_modify(|existing| *existing = existing.max(score))
                .or_insert(score);
        }
    }

    let mut results: Vec<FusedResult> = by_item
        .into_iter()
        .map(|(id, score_by_source)| {
            let combined_score = score_by_source.values().sum();
            FusedResult {
                id,
                score_by_source,
                combined_score,
            }
        })
        .collect();

    results.sort_by(|a, b| {
        b.combined_score
            .partial_cmp(&a.combined_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    results.truncate(final_limit);

    debug!(
        "Fused {} source(s) into {} result(s)",
        inputs.len(),
        results.len()
    );

    Ok(results)
}

// ============================================================================
// Tests
// ============================================================================
