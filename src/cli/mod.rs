//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Caretrail using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Caretrail - access-audited healthcare record store
#[derive(Parser, Debug)]
#[command(name = "caretrail")]
#[command(version, about, long_about = None)]
#[command(author = "Caretrail Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "caretrail.toml", env = "CARETRAIL_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CARETRAIL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Whether the command reads and writes the record store
    pub fn uses_store(&self) -> bool {
        matches!(self.command, Commands::Invoke(_) | Commands::History(_))
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Invoke a ledger function with positional arguments
    Invoke(commands::invoke::InvokeArgs),

    /// Show recorded access events of an actor
    History(commands::history::HistoryArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_invoke() {
        let cli = Cli::parse_from(["caretrail", "invoke", "historyQuery", "nurseA"]);
        assert_eq!(cli.config, "caretrail.toml");
        let Commands::Invoke(args) = cli.command else {
            panic!("expected invoke command");
        };
        assert_eq!(args.function, "historyQuery");
        assert_eq!(args.args, vec!["nurseA".to_string()]);
    }

    #[test]
    fn test_cli_parse_invoke_hyphen_values() {
        let cli = Cli::parse_from([
            "caretrail", "invoke", "createUser", "u1", "-", "-3", "555", "addr",
        ]);
        let Commands::Invoke(args) = cli.command else {
            panic!("expected invoke command");
        };
        assert_eq!(args.args.len(), 5);
        assert_eq!(args.args[2], "-3");
    }

    #[test]
    fn test_cli_parse_invoke_without_args() {
        let cli = Cli::parse_from(["caretrail", "invoke", "query"]);
        let Commands::Invoke(args) = cli.command else {
            panic!("expected invoke command");
        };
        assert!(args.args.is_empty());
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["caretrail", "--config", "custom.toml", "validate-config"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(!cli.uses_store());
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["caretrail", "--log-level", "debug", "history", "--actor", "a"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(cli.uses_store());
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["caretrail", "init", "--with-examples"]);
        assert!(matches!(cli.command, Commands::Init(ref args) if args.with_examples));
    }
}
