//! CLI entrypoint for agent-board
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod cli;
mod commands;

use anyhow::Result;
use board_infrastructure::{ConfigLoader, FileConfig};
use clap::Parser;
use cli::{Cli, Command};
use std::path::Path;
use std::process::ExitCode;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_FILE_PREFIX: &str = "agent-board.log";

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.verbose, cli.log_dir.as_deref());

    let loader = ConfigLoader::new().with_explicit(cli.config.clone());

    match cli.command {
        Command::Config => commands::config(&loader),
        Command::Tools { profile } => {
            let config = load(&loader)?;
            commands::tools(&config, profile.as_deref())
        }
        Command::Transitions { from, to } => {
            let config = load(&loader)?;
            commands::transitions(&config, from.as_deref(), to.as_deref())
        }
        Command::Run(args) => {
            let config = load(&loader)?;
            let worker_args = worker_args(cli.verbose, cli.config.as_deref());
            commands::run(&config, args, worker_args).await
        }
        Command::Worker => {
            let config = load(&loader)?;
            commands::worker(&config).await
        }
    }
}

fn load(loader: &ConfigLoader) -> Result<FileConfig> {
    let config = loader.load_validated()?;
    info!(
        model = %config.gateway.model,
        board = %config.storage.board_path.display(),
        "Configuration loaded"
    );
    Ok(config)
}

/// Logs always go to stderr so stdout stays a clean data channel (the
/// worker's result line in particular). `--log-dir` adds a daily file.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

/// Global flags the isolated worker needs to reproduce this process's setup.
fn worker_args(verbose: u8, config: Option<&Path>) -> Vec<String> {
    let mut args = Vec::new();
    if verbose > 0 {
        args.push(format!("-{}", "v".repeat(verbose as usize)));
    }
    if let Some(path) = config {
        args.push("--config".to_string());
        args.push(path.display().to_string());
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_args() {
        assert!(worker_args(0, None).is_empty());
        assert_eq!(
            worker_args(2, Some(Path::new("board.toml"))),
            vec!["-vv", "--config", "board.toml"]
        );
    }

    #[test]
    fn test_worker_args_round_trip_through_parser() {
        let mut argv = vec!["agent-board".to_string()];
        argv.extend(worker_args(1, Some(Path::new("x.toml"))));
        argv.push("worker".to_string());

        let cli = Cli::try_parse_from(argv).unwrap();
        assert!(matches!(cli.command, Command::Worker));
        assert_eq!(cli.verbose, 1);
    }
}
