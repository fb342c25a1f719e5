//! The Rankfuse CLI application.
//!
//! Wires configuration, the embedding provider, and the corpus-backed
//! sources into a [`FusionExecutor`], and dispatches the parsed commands.

use std::path::Path;
use std::sync::Arc;

use rankfuse_core::{Error, Result, SourceSpec};
use rankfuse_retrieval::{
    EmbeddingProvider, FusionExecutor, LexicalSource, MockEmbeddingProvider, RankedSource,
    RetrySource, SearchClient, VectorSource, VoyageEmbeddingProvider,
};
use tracing_subscriber::EnvFilter;

use crate::cli::{CliArgs, Command, ConfigAction};
use crate::config::RankfuseConfig;
use crate::corpus;

/// The CLI application.
pub struct RankfuseApp {
    config: RankfuseConfig,
    version: String,
}

impl RankfuseApp {
    /// Create from CLI args, loading config from file/env.
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let config = RankfuseConfig::load(args.config.as_deref())?;
        Ok(Self::new(config))
    }

    /// Create with an explicit configuration.
    pub fn new(config: RankfuseConfig) -> Self {
        Self {
            config,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Get a reference to the loaded configuration.
    pub fn config(&self) -> &RankfuseConfig {
        &self.config
    }

    /// Initialise tracing-based logging.
    ///
    /// Uses `RUST_LOG` env var if set, otherwise defaults based on verbosity flags.
    pub fn init_logging(&self, verbose: bool, quiet: bool) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if quiet {
            EnvFilter::new("warn")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        };

        // Ignore error if a subscriber is already set (e.g. in tests).
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }

    /// Run the CLI with the given arguments.
    pub async fn run(&self, args: CliArgs) -> Result<()> {
        self.init_logging(args.verbose, args.quiet);

        match args.command {
            Some(Command::Query {
                query,
                corpus,
                limit,
                json,
                ids_only,
            }) => {
                self.handle_query(&query, &corpus, limit, json, ids_only)
                    .await
            }
            Some(Command::Config(config_cmd)) => {
                self.handle_config(args.config.as_deref(), config_cmd.command)
            }
            Some(Command::Version) => {
                println!("rankfuse {}", self.version);
                Ok(())
            }
            None => {
                println!("rankfuse {} — use --help for usage", self.version);
                Ok(())
            }
        }
    }

    /// Build the configured embedding provider.
    fn build_embedder(&self) -> Result<Arc<dyn EmbeddingProvider>> {
        let fusion = &self.config.fusion;
        match self.config.embedding.provider.as_str() {
            "mock" => Ok(Arc::new(MockEmbeddingProvider::new(
                fusion.embedding_dimension,
            ))),
            "voyage" => {
                let api_key = self.config.embedding.resolve_api_key()?;
                let mut provider = VoyageEmbeddingProvider::new(
                    api_key,
                    fusion.embedding_model.clone(),
                    fusion.embedding_dimension,
                )?;
                if let Some(endpoint) = &self.config.embedding.endpoint {
                    provider = provider.with_endpoint(endpoint.clone());
                }
                Ok(Arc::new(provider))
            }
            other => Err(Error::config(format!(
                "unknown embedding provider '{other}' (expected 'mock' or 'voyage')"
            ))),
        }
    }

    async fn handle_query(
        &self,
        query: &str,
        corpus_path: &Path,
        limit: Option<usize>,
        json: bool,
        ids_only: bool,
    ) -> Result<()> {
        let embedder = self.build_embedder()?;
        let corpus = corpus::load(corpus_path, embedder.as_ref()).await?;

        let mut fusion = self.config.fusion.clone();
        if let Some(limit) = limit {
            fusion.final_limit = limit;
        }

        let client = corpus.client.clone() as Arc<dyn SearchClient>;
        let vector: Arc<dyn RankedSource> = Arc::new(RetrySource::new(Arc::new(
            VectorSource::new("vector", embedder, client.clone()),
        )));
        let lexical: Arc<dyn RankedSource> =
            Arc::new(RetrySource::new(Arc::new(LexicalSource::new("text", client))));

        let sources = vec![
            (
                SourceSpec::new("vector").with_priority(fusion.vector_priority),
                vector,
            ),
            (
                SourceSpec::new("text").with_priority(fusion.text_priority),
                lexical,
            ),
        ];

        let executor =
            FusionExecutor::new(fusion, sources)?.with_hydrator(corpus.hydrator.clone());

        if ids_only {
            let outcome = executor.run(query).await?;
            warn_unavailable(&outcome.sources_unavailable);
            for (position, result) in outcome.results.iter().enumerate() {
                if json {
                    println!("{}", serde_json::to_string(result).map_err(|e| Error::serialization(e.to_string()))?);
                } else {
                    println!(
                        "{:>3}. {}  score={:.4}",
                        position + 1,
                        result.id,
                        result.combined_score
                    );
                }
            }
        } else {
            let outcome = executor.run_hydrated(query).await?;
            warn_unavailable(&outcome.sources_unavailable);
            for (position, result) in outcome.results.iter().enumerate() {
                if json {
                    println!("{}", serde_json::to_string(result).map_err(|e| Error::serialization(e.to_string()))?);
                } else {
                    let title = result
                        .document
                        .title
                        .as_deref()
                        .unwrap_or(result.document.id.as_str());
                    let year = result
                        .document
                        .year
                        .map(|y| format!(" ({y})"))
                        .unwrap_or_default();
                    println!(
                        "{:>3}. {title}{year}  score={:.4}",
                        position + 1,
                        result.combined_score
                    );
                }
            }
        }

        Ok(())
    }

    fn handle_config(&self, config_flag: Option<&str>, action: ConfigAction) -> Result<()> {
        match action {
            ConfigAction::Path => {
                match RankfuseConfig::resolve_config_path(config_flag) {
                    Some(path) => println!("{}", path.display()),
                    None => println!("(no config path resolved)"),
                }
                Ok(())
            }
            ConfigAction::Show => {
                println!("{}", self.config.to_toml_string()?);
                Ok(())
            }
            ConfigAction::Init { file, force } => {
                let path = file
                    .map(std::path::PathBuf::from)
                    .or_else(RankfuseConfig::default_config_path)
                    .ok_or_else(|| Error::config("could not determine config path"))?;

                if path.exists() && !force {
                    return Err(Error::config(format!(
                        "{} already exists (use --force to overwrite)",
                        path.display()
                    )));
                }

                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&path, RankfuseConfig::default().to_toml_string()?)?;
                println!("wrote {}", path.display());
                Ok(())
            }
        }
    }
}

fn warn_unavailable(sources: &[String]) {
    if !sources.is_empty() {
        log::warn!("results are partial; unavailable sources: {}", sources.join(", "));
    }
}

// ============================================================================
// Tests
// ============================================================================
