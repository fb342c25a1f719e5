//! CLI argument parsing and command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

// ============================================================================
// CLI argument types
// ============================================================================

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "rankfuse", author, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file.
    #[arg(short, long, env = "RANKFUSE_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a hybrid query against a corpus.
    Query {
        /// The query text.
        query: String,

        /// Path to a JSON-lines corpus file.
        #[arg(long, env = "RANKFUSE_CORPUS")]
        corpus: PathBuf,

        /// Override the configured result limit.
        #[arg(short, long)]
        limit: Option<usize>,

        /// Emit results as JSON lines instead of a table.
        #[arg(long)]
        json: bool,

        /// Print bare identifiers and scores, skipping hydration.
        #[arg(long)]
        ids_only: bool,
    },

    /// Configuration operations.
    Config(ConfigCommand),

    /// Print version information.
    Version,
}

/// Config-specific subcommands.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Config subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigAction,
}

/// Available config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path.
    Path,

    /// Show the effective configuration as TOML.
    Show,

    /// Create a default configuration file.
    Init {
        /// Output file path (defaults to XDG config path).
        #[arg(short, long)]
        file: Option<String>,

        /// Overwrite existing file.
        #[arg(long)]
        force: bool,
    },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_args_default() {
        let args = CliArgs::parse_from(["rankfuse"]);
        assert!(args.config.is_none());
        assert!(!args.verbose);
        assert!(!args.quiet);
        assert!(args.command.is_none());
    }

    #[test]
    fn test_cli_args_verbose() {
        let args = CliArgs::parse_from(["rankfuse", "--verbose"]);
        assert!(args.verbose);
    }

    #[test]
    fn test_query_command() {
        let args = CliArgs::parse_from([
            "rankfuse",
            "query",
            "superheroes saving the world",
            "--corpus",
            "movies.jsonl",
        ]);
        match args.command {
            Some(Command::Query {
                query,
                corpus,
                limit,
                json,
                ids_only,
            }) => {
                assert_eq!(query, "superheroes saving the world");
                assert_eq!(corpus, PathBuf::from("movies.jsonl"));
                assert!(limit.is_none());
                assert!(!json);
                assert!(!ids_only);
            }
            _ => panic!("Expected Query command"),
        }
    }

    #[test]
    fn test_query_command_with_limit_and_json() {
        let args = CliArgs::parse_from([
            "rankfuse", "query", "heist", "--corpus", "c.jsonl", "--limit", "3", "--json",
        ]);
        match args.command {
            Some(Command::Query { limit, json, .. }) => {
                assert_eq!(limit, Some(3));
                assert!(json);
            }
            _ => panic!("Expected Query command"),
        }
    }

    #[test]
    fn test_version_command() {
        let args = CliArgs::parse_from(["rankfuse", "version"]);
        assert!(matches!(args.command, Some(Command::Version)));
    }

    #[test]
    fn test_config_path_command() {
        let args = CliArgs::parse_from(["rankfuse", "config", "path"]);
        match args.command {
            Some(Command::Config(ConfigCommand {
                command: ConfigAction::Path,
            })) => {}
            _ => panic!("Expected Config Path command"),
        }
    }

    #[test]
    fn test_config_init_force() {
        let args = CliArgs::parse_from(["rankfuse", "config", "init", "--force"]);
        match args.command {
            Some(Command::Config(ConfigCommand {
                command: ConfigAction::Init { force, .. },
            })) => assert!(force),
            _ => panic!("Expected Config Init command"),
        }
    }
}
