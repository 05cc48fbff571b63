//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Chainsink using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Chainsink - batched PostgreSQL exporter for ETL items
#[derive(Parser, Debug)]
#[command(name = "chainsink")]
#[command(version, about, long_about = None)]
#[command(author = "Chainsink Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "chainsink.toml", env = "CHAINSINK_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CHAINSINK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export NDJSON items into PostgreSQL
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_export() {
        let cli = Cli::parse_from(["chainsink", "export"]);
        assert_eq!(cli.config, "chainsink.toml");
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.input, "-");
                assert!(!args.dry_run);
                assert!(args.chunk_size.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_export_overrides() {
        let cli = Cli::parse_from([
            "chainsink",
            "export",
            "--input",
            "blocks.json",
            "--dry-run",
            "--chunk-size",
            "500",
            "--workers",
            "8",
            "--batch-size",
            "2000",
        ]);
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.input, "blocks.json");
                assert!(args.dry_run);
                assert_eq!(args.chunk_size, Some(500));
                assert_eq!(args.workers, Some(8));
                assert_eq!(args.batch_size, Some(2000));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["chainsink", "--config", "custom.toml", "export"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["chainsink", "--log-level", "debug", "export"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["chainsink", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["chainsink", "init", "--force"]);
        assert!(matches!(cli.command, Commands::Init(ref args) if args.force));
    }
}
