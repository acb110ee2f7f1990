//! CLI command definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for agent-board
#[derive(Parser, Debug)]
#[command(name = "agent-board")]
#[command(author, version, about = "Run tool-using agents against project tickets")]
#[command(long_about = r#"
agent-board runs one agent per ticket. Each agent is confined to the tools its
profile allows, works inside a single workspace directory, and finishes with a
structured result: comments to post and an optional ticket state change.

Configuration files are loaded from (in priority order):
1. BOARD_* environment variables (BOARD_GATEWAY__MODEL=...)
2. --config <path>     Explicit config file
3. ./board.toml        Project-level config
4. ~/.config/agent-board/config.toml   Global config

Example:
  agent-board tools --profile developer
  agent-board transitions --from research --to plan_approval
  agent-board run --project P-1 --ticket T-7 --profile developer \
      --workspace ./repo --persona dev-1 --task "Fix the failing test" --apply
"#)]
pub struct Cli {
    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Also write logs to a daily-rotated file in this directory
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print tool surfaces as JSON
    Tools {
        /// Only the tools this profile may call
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
    },

    /// Print the ticket lifecycle, or check one transition
    Transitions {
        #[arg(long, value_name = "STATE", requires = "to")]
        from: Option<String>,

        #[arg(long, value_name = "STATE", requires = "from")]
        to: Option<String>,
    },

    /// Run an agent on a ticket and print its result as JSON
    Run(RunArgs),

    /// Isolated runner entry point: request on stdin, result on stdout
    #[command(hide = true)]
    Worker,

    /// Show configuration sources and validation issues
    Config,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[arg(long, value_name = "ID")]
    pub project: String,

    #[arg(long, value_name = "ID")]
    pub ticket: String,

    /// Profile (role) the agent runs as
    #[arg(long, value_name = "NAME")]
    pub profile: String,

    /// Directory the agent's file and command tools are confined to
    #[arg(long, value_name = "DIR")]
    pub workspace: PathBuf,

    /// Instruction for this run
    #[arg(long, value_name = "TEXT")]
    pub task: String,

    /// Persona the agent acts as (needed for comments and documents)
    #[arg(long, value_name = "ID")]
    pub persona: Option<String>,

    #[arg(long, value_name = "BRANCH")]
    pub branch: Option<String>,

    #[arg(long, value_name = "REMOTE")]
    pub remote: Option<String>,

    /// Override `agent.max_duration_secs`
    #[arg(long, value_name = "SECS")]
    pub max_duration_secs: Option<u64>,

    /// Run the agent in a child process
    #[arg(long)]
    pub isolated: bool,

    /// Post the result's comments and apply its state change
    #[arg(long)]
    pub apply: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from([
            "agent-board",
            "-vv",
            "run",
            "--project",
            "P-1",
            "--ticket",
            "T-1",
            "--profile",
            "developer",
            "--workspace",
            "/tmp/ws",
            "--task",
            "fix it",
            "--isolated",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.ticket, "T-1");
        assert!(args.isolated);
        assert!(!args.apply);
        assert!(args.persona.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["agent-board", "worker", "--config", "x.toml", "-v"]).unwrap();
        assert!(matches!(cli.command, Command::Worker));
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_transition_check_needs_both_states() {
        assert!(Cli::try_parse_from(["agent-board", "transitions", "--from", "backlog"]).is_err());
        assert!(
            Cli::try_parse_from(["agent-board", "transitions", "--from", "backlog", "--to", "research"])
                .is_ok()
        );
    }
}
