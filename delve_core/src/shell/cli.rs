//! # Delve CLI
//!
//! Command-line interface definition and main entry point.

use super::{modes, render::OutputFormat};

use crate::{
    config::EngineConfig, listener::LoggingListener, middleware::LoggingMiddleware,
    sandbox::SandboxedExecutor, utils::logging::init_logging,
};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

/// Delve: a sandboxed shell-command engine.
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about,
    long_about = "delve runs in two modes:

1. REPL Mode (default): read commands from stdin, one per line.
   Example: delve --root ./world --protected inventory

2. Single Command Mode: execute one command and exit with 0 on success, 1 on failure.
   Example: delve --root ./world -- mkdir cave"
)]
pub struct Cli {
    /// Path to a TOML engine configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Sandbox root directory (overrides the config file)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Protected directory, relative to the root (overrides the config file)
    #[arg(long)]
    pub protected: Option<PathBuf>,

    /// Kill native commands after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Allow ls/cat/tree to read outside the sandbox root
    #[arg(long)]
    pub unconfined_reads: bool,

    /// Print every result as JSON
    #[arg(long)]
    pub json: bool,

    /// Write the command history as JSON to this file on exit
    #[arg(long)]
    pub history_out: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Log to stderr instead of file
    #[arg(long)]
    pub log_to_stderr: bool,

    /// Command to execute (single command mode)
    #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
    pub command: Vec<String>,
}

impl Cli {
    /// Merge command-line overrides into the file (or default) configuration.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load_from_file(path)?,
            None => EngineConfig::default(),
        };

        if let Some(root) = &self.root {
            config.sandbox_root = root.clone();
        }
        if let Some(protected) = &self.protected {
            config.protected_dir = Some(protected.clone());
        }
        if let Some(timeout) = self.timeout {
            config.command_timeout_seconds = Some(timeout);
        }
        if self.unconfined_reads {
            config.confine_reads = false;
        }
        if self.debug {
            config.log_level = "debug".to_string();
        }
        Ok(config)
    }

    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Parse arguments, build the sandbox, and run the selected mode.
///
/// Returns the process exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = cli.engine_config()?;

    init_logging(&config.log_level, !cli.log_to_stderr)?;

    let mut executor =
        SandboxedExecutor::from_config(&config).context("Failed to initialize sandbox")?;
    executor.add_middleware(LoggingMiddleware);
    executor.add_listener(LoggingListener);

    let code = if cli.command.is_empty() {
        tracing::info!("Running in REPL mode");
        let stdin = std::io::stdin();
        modes::run_repl(
            &mut executor,
            stdin.lock(),
            std::io::stdout(),
            cli.output_format(),
        )?
    } else {
        tracing::info!("Running in single command mode");
        modes::run_single(
            &mut executor,
            &cli.command.join(" "),
            std::io::stdout(),
            cli.output_format(),
        )?
    };

    if let Some(path) = &cli.history_out {
        let json = executor.history().to_json()?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write history to {}", path.display()))?;
        tracing::info!("History written to {:?}", path);
    }

    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "delve",
            "--root",
            "/srv/world",
            "--protected",
            "inventory",
            "--timeout",
            "3",
            "--unconfined-reads",
            "--json",
        ]);
        let config = cli.engine_config().unwrap();
        assert_eq!(config.sandbox_root, PathBuf::from("/srv/world"));
        assert_eq!(config.protected_dir, Some(PathBuf::from("inventory")));
        assert_eq!(config.command_timeout_seconds, Some(3));
        assert!(!config.confine_reads);
        assert_eq!(cli.output_format(), OutputFormat::Json);
        assert!(cli.command.is_empty());
    }

    #[test]
    fn test_trailing_command_keeps_flags() {
        let cli = Cli::parse_from(["delve", "--", "rm", "-r", "cave"]);
        assert_eq!(cli.command, vec!["rm", "-r", "cave"]);
    }

    #[test]
    fn test_config_file_then_flags() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("delve.toml");
        std::fs::write(&path, "sandbox_root = \"from-file\"\ncommand_timeout_seconds = 9\n")
            .unwrap();

        let cli = Cli::parse_from([
            "delve",
            "--config",
            path.to_str().unwrap(),
            "--root",
            "from-flag",
        ]);
        let config = cli.engine_config().unwrap();
        assert_eq!(config.sandbox_root, PathBuf::from("from-flag"));
        assert_eq!(config.command_timeout_seconds, Some(9));
    }
}
