//! Configuration for the Rankfuse CLI.
//!
//! Provides the [`RankfuseConfig`] struct that loads from TOML files,
//! environment variables, and defaults using the `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `RANKFUSE_CONFIG` environment variable
//! 3. XDG default: `~/.config/rankfuse/config.toml`
//! 4. Built-in defaults

use confyg::{env, Confygery};
use rankfuse_core::{Error, FusionConfig, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Configuration structs
// ============================================================================

/// Main configuration for the Rankfuse CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankfuseConfig {
    /// Project name, used for env var prefixes and default paths.
    pub project_name: String,

    /// Embedding service configuration.
    pub embedding: EmbeddingConfig,

    /// Fusion pipeline configuration.
    pub fusion: FusionConfig,
}

/// Embedding service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Provider to use: "mock" or "voyage".
    pub provider: String,

    /// API key for remote providers. Falls back to `VOYAGE_API_KEY`.
    pub api_key: Option<String>,

    /// Override the provider endpoint.
    pub endpoint: Option<String>,
}

// ============================================================================
// Default implementations
// ============================================================================

impl Default for RankfuseConfig {
    fn default() -> Self {
        Self {
            project_name: "rankfuse".to_string(),
            embedding: EmbeddingConfig::default(),
            fusion: FusionConfig::default(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "mock".to_string(),
            api_key: None,
            endpoint: None,
        }
    }
}

impl EmbeddingConfig {
    /// The API key, from config or the `VOYAGE_API_KEY` env var.
    pub fn resolve_api_key(&self) -> Result<String> {
        if let Some(key) = &self.api_key {
            return Ok(key.clone());
        }
        std::env::var("VOYAGE_API_KEY")
            .map_err(|_| Error::config("no embedding API key: set embedding.api_key or VOYAGE_API_KEY"))
    }
}

// ============================================================================
// Config loading
// ============================================================================

impl RankfuseConfig {
    /// Load configuration from file, environment, and defaults.
    ///
    /// Loading priority:
    /// 1. Explicit `config_path` (from `--config` flag)
    /// 2. `RANKFUSE_CONFIG` env var
    /// 3. XDG default: `~/.config/rankfuse/config.toml`
    /// 4. Built-in defaults
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path) {
            if path.exists() {
                builder
                    .add_file(&path.to_string_lossy())
                    .map_err(|e| Error::config(format!("config file: {e}")))?;
            }
        }

        let mut env_opts = env::Options::with_top_level("RANKFUSE");
        env_opts.add_section("embedding");
        env_opts.add_section("fusion");
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        let config: Self = builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))?;

        config.fusion.validate()?;
        Ok(config)
    }

    /// Resolve the config file path from explicit flag, env var, or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        // 1. Explicit --config flag
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }

        // 2. RANKFUSE_CONFIG env var
        if let Ok(path) = std::env::var("RANKFUSE_CONFIG") {
            return Some(PathBuf::from(path));
        }

        // 3. XDG default
        Self::default_config_path()
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("rankfuse").join("config.toml"))
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rankfuse_core::PartialFailurePolicy;

    /// RAII guard for env var manipulation in tests.
    struct EnvGuard {
        key: String,
        prev: Option<String>,
    }

    impl EnvGuard {
        fn new(key: &str, value: &str) -> Self {
            let prev = std::env::var(key).ok();
            // SAFETY: tests touching the environment are not run in
            // parallel with other env readers for these keys.
            unsafe { std::env::set_var(key, value) };
            Self {
                key: key.to_string(),
                prev,
            }
        }

        fn remove(key: &str) -> Self {
            let prev = std::env::var(key).ok();
            // SAFETY: see `new`.
            unsafe { std::env::remove_var(key) };
            Self {
                key: key.to_string(),
                prev,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            // SAFETY: see `new`.
            unsafe {
                if let Some(ref val) = self.prev {
                    std::env::set_var(&self.key, val);
                } else {
                    std::env::remove_var(&self.key);
                }
            }
        }
    }

    #[test]
    fn test_rankfuse_config_default() {
        let config = RankfuseConfig::default();
        assert_eq!(config.project_name, "rankfuse");
        assert_eq!(config.embedding.provider, "mock");
        assert!(config.embedding.api_key.is_none());
        assert_eq!(config.fusion.final_limit, 10);
        assert_eq!(config.fusion.embedding_model, "voyage-3.5");
    }

    #[test]
    fn test_rankfuse_config_from_toml() {
        let toml_str = r#"
            project_name = "movies"

            [embedding]
            provider = "voyage"
            api_key = "sk-test"

            [fusion]
            final_limit = 5
            vector_priority = 2
            partial_failure = "strict"
        "#;

        let config: RankfuseConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.project_name, "movies");
        assert_eq!(config.embedding.provider, "voyage");
        assert_eq!(config.embedding.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.fusion.final_limit, 5);
        assert_eq!(config.fusion.vector_priority, 2);
        assert_eq!(config.fusion.partial_failure, PartialFailurePolicy::Strict);
        // Unset fields keep defaults.
        assert_eq!(config.fusion.overrequest_factor, 10);
    }

    #[test]
    fn test_rankfuse_config_to_toml_round_trip() {
        let config = RankfuseConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        assert!(toml_str.contains("project_name = \"rankfuse\""));
        assert!(toml_str.contains("[fusion]"));

        let parsed: RankfuseConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.fusion.final_limit, config.fusion.final_limit);
    }

    #[test]
    fn test_rankfuse_config_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
                project_name = "loaded"
                [fusion]
                final_limit = 3
            "#,
        )
        .unwrap();

        let config = RankfuseConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.project_name, "loaded");
        assert_eq!(config.fusion.final_limit, 3);
    }

    #[test]
    fn test_rankfuse_config_load_defaults_for_missing_file() {
        let config = RankfuseConfig::load(Some("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.project_name, "rankfuse");
    }

    #[test]
    fn test_rankfuse_config_load_rejects_invalid_fusion() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
                [fusion]
                overrequest_factor = 0
            "#,
        )
        .unwrap();

        let err = RankfuseConfig::load(Some(path.to_str().unwrap())).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_resolve_config_path_explicit() {
        let path = RankfuseConfig::resolve_config_path(Some("/explicit/config.toml"));
        assert_eq!(path, Some(PathBuf::from("/explicit/config.toml")));
    }

    // Env and default resolution share one test so parallel test threads
    // never race on RANKFUSE_CONFIG.
    #[test]
    fn test_resolve_config_path_env_and_default() {
        {
            let _guard = EnvGuard::new("RANKFUSE_CONFIG", "/env/config.toml");
            let path = RankfuseConfig::resolve_config_path(None);
            assert_eq!(path, Some(PathBuf::from("/env/config.toml")));
        }

        let _guard = EnvGuard::remove("RANKFUSE_CONFIG");
        let path = RankfuseConfig::resolve_config_path(None);
        assert!(path.is_some());
        let p = path.unwrap();
        assert!(p.to_str().unwrap().contains("rankfuse"));
        assert!(p.to_str().unwrap().ends_with("config.toml"));
    }

    #[test]
    fn test_resolve_api_key_from_config() {
        let embedding = EmbeddingConfig {
            api_key: Some("sk-config".to_string()),
            ..Default::default()
        };
        assert_eq!(embedding.resolve_api_key().unwrap(), "sk-config");
    }

    #[test]
    fn test_resolve_api_key_missing() {
        let _guard = EnvGuard::remove("VOYAGE_API_KEY");
        let embedding = EmbeddingConfig::default();
        assert!(embedding.resolve_api_key().is_err());
    }
}
