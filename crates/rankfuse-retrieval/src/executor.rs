//! The fusion executor.
//!
//! `FusionExecutor` owns the end-to-end hybrid retrieval call: fan the
//! query out to every registered source concurrently, apply the deadline
//! and the partial-failure policy, fuse the surviving candidate lists,
//! and optionally hydrate the fused results into display documents.
//!
//! The deadline is applied per source rather than around the whole
//! fan-out, so under the tolerate policy a slow source times out on its
//! own while the finished ones still contribute to fusion.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rankfuse_core::{fuse, Error, FusionConfig, FusionOutcome, PartialFailurePolicy, Result, SourceSpec};

use crate::hydrate::{hydrate, DocumentHydrator, HydratedResult};
use crate::source::RankedSource;

/// A hydrated retrieval outcome: display documents in fused order.
#[derive(Debug, Clone)]
pub struct HydratedOutcome {
    /// Hydrated results, best first. May be shorter than the fused list
    /// when documents have disappeared from the store.
    pub results: Vec<HydratedResult>,

    /// Names of sources that failed and contributed nothing.
    pub sources_unavailable: Vec<String>,
}

/// Executes hybrid retrieval across registered sources.
pub struct FusionExecutor {
    sources: Vec<(SourceSpec, Arc<dyn RankedSource>)>,
    config: FusionConfig,
    hydrator: Option<Arc<dyn DocumentHydrator>>,
}

impl FusionExecutor {
    /// Create an executor over the given sources.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the config fails validation, if no
    /// sources are given, or if two sources share a name.
    pub fn new(
        config: FusionConfig,
        sources: Vec<(SourceSpec, Arc<dyn RankedSource>)>,
    ) -> Result<Self> {
        config.validate()?;
        if sources.is_empty() {
            return Err(Error::config("at least one source is required"));
        }

        let mut seen = std::collections::HashSet::new();
        for (spec, _) in &sources {
            if !seen.insert(spec.name.as_str()) {
                return Err(Error::config(format!(
                    "duplicate source name '{}'",
                    spec.name
                )));
            }
        }

        Ok(Self {
            sources,
            config,
            hydrator: None,
        })
    }

    /// Attach a document hydrator, enabling [`run_hydrated`](Self::run_hydrated).
    pub fn with_hydrator(mut self, hydrator: Arc<dyn DocumentHydrator>) -> Self {
        self.hydrator = Some(hydrator);
        self
    }

    /// The configuration this executor runs with.
    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// Run the full fan-out, fuse, and return ranked identifiers.
    pub async fn run(&self, query: &str) -> Result<FusionOutcome> {
        let candidate_limit = self.config.candidate_limit();
        let deadline = Duration::from_millis(self.config.timeout_ms);

        let calls = self.sources.iter().map(|(spec, source)| {
            let source = source.clone();
            async move {
                let started = Instant::now();
                let outcome = match tokio::time::timeout(deadline, source.retrieve(query, candidate_limit)).await
                {
                    Ok(result) => result,
                    Err(_) => Err(Error::timeout(started.elapsed().as_millis() as u64)),
                };
                (spec, outcome)
            }
        });

        let retrievals = futures::future::join_all(calls).await;

        let mut inputs = Vec::with_capacity(retrievals.len());
        let mut sources_unavailable = Vec::new();
        let mut first_error = None;

        for (spec, outcome) in retrievals {
            match outcome {
                Ok(candidates) => inputs.push((spec.clone(), candidates)),
                Err(err) => match self.config.partial_failure {
                    PartialFailurePolicy::Strict => return Err(err),
                    PartialFailurePolicy::Tolerate => {
                        log::warn!("source '{}' unavailable, fusing without it: {err}", spec.name);
                        sources_unavailable.push(spec.name.clone());
                        if first_error.is_none() {
                            first_error = Some(err);
                        }
                    }
                },
            }
        }

        if inputs.is_empty() {
            // Tolerate degrades gracefully only while something survives.
            return Err(first_error.unwrap_or_else(|| Error::config("no sources registered")));
        }

        let results = fuse(&inputs, self.config.final_limit)?;
        log::info!(
            "fused {} results from {}/{} sources",
            results.len(),
            inputs.len(),
            self.sources.len()
        );

        Ok(FusionOutcome {
            results,
            sources_unavailable,
        })
    }

    /// Run the fan-out and hydrate the fused results into documents.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if no hydrator is attached, plus any error
    /// [`run`](Self::run) or the batch fetch can produce.
    pub async fn run_hydrated(&self, query: &str) -> Result<HydratedOutcome> {
        let hydrator = self
            .hydrator
            .as_ref()
            .ok_or_else(|| Error::config("no hydrator attached"))?;

        let outcome = self.run(query).await?;
        let results = hydrate(hydrator.as_ref(), &outcome.results).await?;

        Ok(HydratedOutcome {
            results,
            sources_unavailable: outcome.sources_unavailable,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
