//! Subcommand handlers. Each one wires the layers it needs from the loaded
//! configuration and reports through stdout (data) and tracing (progress).

use crate::cli::RunArgs;
use anyhow::{Context, Result, bail};
use board_application::{
    AgentRunParams, AgentRunner, ApplyRunResultUseCase, ConversationLogger, DatabaseOperations,
    ProfileCatalog, RunAgentUseCase, TicketStateMachine, Workspace, WorkspaceInfo,
};
use board_domain::{AgentRunResult, TicketState, TransitionTable};
use board_infrastructure::runner::wire::{read_request, write_result};
use board_infrastructure::{
    ConfigLoader, FileConfig, JsonFileDatabase, JsonlConversationLogger, LocalWorkspaceExecutor,
    OpenAiCompatibleGateway, ProcessAgentRunner, ToolRegistry, build_registry,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};

const DEFAULT_SESSION_ROOT: &str = ".board/sessions";

type InProcessRunner = RunAgentUseCase<OpenAiCompatibleGateway, ToolRegistry>;

/// `agent-board tools`
pub fn tools(config: &FileConfig, profile: Option<&str>) -> Result<ExitCode> {
    let registry = registry(config)?;
    let surfaces = match profile {
        Some(name) => {
            if !registry.profile_names().iter().any(|p| p == name) {
                bail!(
                    "unknown profile '{}' (known: {})",
                    name,
                    registry.profile_names().join(", ")
                );
            }
            registry.surfaces_for_profile(name)
        }
        None => registry.all_surfaces(),
    };
    println!("{}", serde_json::to_string_pretty(&surfaces)?);
    Ok(ExitCode::SUCCESS)
}

/// `agent-board transitions`
pub fn transitions(config: &FileConfig, from: Option<&str>, to: Option<&str>) -> Result<ExitCode> {
    let table = config.transition_table();

    if let (Some(from), Some(to)) = (from, to) {
        return Ok(match check_transition(&table, from, to)? {
            Ok(()) => {
                println!("valid: {} -> {}", from, to);
                ExitCode::SUCCESS
            }
            Err(reason) => {
                println!("invalid: {}", reason);
                ExitCode::from(1)
            }
        });
    }

    for (state, targets) in table.entries() {
        if targets.is_empty() {
            println!("{} (terminal)", state);
        } else {
            let targets: Vec<_> = targets.iter().map(TicketState::as_str).collect();
            println!("{} -> {}", state, targets.join(", "));
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Outer error: a state name did not parse. Inner error: the table forbids it.
fn check_transition(
    table: &TransitionTable,
    from: &str,
    to: &str,
) -> Result<std::result::Result<(), String>> {
    let from: TicketState = from.parse()?;
    let to: TicketState = to.parse()?;
    Ok(table.check(from, to).map_err(|e| e.to_string()))
}

/// `agent-board config`
pub fn config(loader: &ConfigLoader) -> Result<ExitCode> {
    println!("Configuration sources (highest priority first):");
    for source in loader.sources() {
        let path = source
            .path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(unavailable)".to_string());
        let marker = if source.found { "found" } else { "not found" };
        println!("  {:<9} {} [{}]", source.label, path, marker);
    }

    let config = match loader.load() {
        Ok(config) => config,
        Err(e) => {
            println!();
            println!("{}", e);
            return Ok(ExitCode::from(1));
        }
    };

    let issues = config.validate();
    println!();
    if issues.is_empty() {
        println!("No configuration issues.");
        return Ok(ExitCode::SUCCESS);
    }
    for issue in &issues {
        println!("  {}", issue);
    }
    Ok(if issues.iter().any(|i| i.is_error()) {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}

/// `agent-board run`
///
/// Exit code 2 when the run ended in `timeout` or `error`.
pub async fn run(config: &FileConfig, args: RunArgs, worker_args: Vec<String>) -> Result<ExitCode> {
    if args.apply && args.persona.is_none() {
        bail!("--apply needs --persona: comments are posted as that persona");
    }

    let catalog = config.profile_catalog();
    let profile = catalog.profile(&args.profile).with_context(|| {
        format!(
            "unknown profile '{}' (known: {})",
            args.profile,
            catalog.profile_names().join(", ")
        )
    })?;

    let root = std::fs::canonicalize(&args.workspace)
        .with_context(|| format!("workspace {} is not accessible", args.workspace.display()))?;
    let mut info = WorkspaceInfo::new(&root);
    if let Some(branch) = &args.branch {
        info = info.with_branch(branch);
    }
    if let Some(remote) = &args.remote {
        info = info.with_remote(remote);
    }
    if let Some(persona) = &args.persona {
        info = info.with_persona(persona);
    }

    let session_dir = session_dir(config, &args.ticket);
    std::fs::create_dir_all(&session_dir)
        .with_context(|| format!("cannot create session dir {}", session_dir.display()))?;

    let params = AgentRunParams {
        project_id: args.project.clone(),
        ticket_id: Some(args.ticket.clone()),
        profile: profile.name.clone(),
        task: args.task.clone(),
        system_prompt: profile.system_prompt.clone(),
        workflow: profile.workflow.clone(),
        workspace: Workspace::new(info, Arc::new(LocalWorkspaceExecutor::new(&root))),
        session_dir: Some(session_dir.clone()),
        max_duration: args
            .max_duration_secs
            .map(std::time::Duration::from_secs)
            .unwrap_or_else(|| config.agent.max_duration()),
    };

    info!(
        ticket_id = %args.ticket,
        profile = %args.profile,
        isolated = args.isolated,
        session_dir = %session_dir.display(),
        "Starting agent run"
    );

    // The worker writes through its own handle, so in isolated mode the
    // board is only opened after it exits.
    let (result, db) = if args.isolated {
        let runner = ProcessAgentRunner::current_exe(worker_args)
            .context("cannot locate the agent-board executable")?;
        (runner.run(params).await, None)
    } else {
        let db = open_database(config).await?;
        let runner = in_process_runner(config, db.clone(), Some(&session_dir))?;
        (runner.run(params).await, Some(db))
    };

    println!("{}", serde_json::to_string_pretty(&result)?);

    if args.apply
        && let Some(persona) = &args.persona
    {
        let db = match db {
            Some(db) => db,
            None => open_database(config).await?,
        };
        apply(config, db, &args.ticket, persona, &result).await?;
    }

    Ok(if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}

/// `agent-board worker`
///
/// stdout carries exactly one result line; everything else goes to stderr.
pub async fn worker(config: &FileConfig) -> Result<ExitCode> {
    let request = read_request(&mut tokio::io::stdin())
        .await
        .context("reading run request from stdin")?;
    let session_dir = request.session_dir.clone();
    let executor = Arc::new(LocalWorkspaceExecutor::new(&request.workspace.root_path));
    let params = request.into_params(executor);

    let db = open_database(config).await?;
    let runner = in_process_runner(config, db, session_dir.as_deref())?;
    let result = runner.run(params).await;

    write_result(&mut tokio::io::stdout(), &result)
        .await
        .context("writing run result to stdout")?;
    Ok(ExitCode::SUCCESS)
}

async fn apply(
    config: &FileConfig,
    db: Arc<dyn DatabaseOperations>,
    ticket_id: &str,
    persona_id: &str,
    result: &AgentRunResult,
) -> Result<()> {
    let use_case = ApplyRunResultUseCase::new(db, state_machine(config));
    let applied = use_case
        .apply(ticket_id, persona_id, result)
        .await
        .context("applying run result")?;

    let transition = match &applied.transition {
        Some(Ok(ticket)) => json!({ "state": ticket.state }),
        Some(Err(e)) => json!({ "rejected": e }),
        None => json!(null),
    };
    eprintln!(
        "{}",
        json!({ "comments_posted": applied.comments_posted, "transition": transition })
    );
    Ok(())
}

fn state_machine(config: &FileConfig) -> TicketStateMachine {
    TicketStateMachine::new(config.transition_table())
}

fn registry(config: &FileConfig) -> Result<ToolRegistry> {
    let catalog: Arc<dyn ProfileCatalog> = Arc::new(config.profile_catalog());
    build_registry(catalog, state_machine(config), config.execution_params())
        .context("building tool registry")
}

async fn open_database(config: &FileConfig) -> Result<Arc<dyn DatabaseOperations>> {
    let path = &config.storage.board_path;
    let db = JsonFileDatabase::open(path)
        .await
        .with_context(|| format!("opening board file {}", path.display()))?;
    Ok(Arc::new(db))
}

fn in_process_runner(
    config: &FileConfig,
    db: Arc<dyn DatabaseOperations>,
    session_dir: Option<&Path>,
) -> Result<InProcessRunner> {
    let gateway_config = &config.gateway;
    let api_key = gateway_config.api_key();
    if api_key.is_none() {
        warn!(
            env = %gateway_config.api_key_env,
            "No API key in environment; requests are sent unauthenticated"
        );
    }
    let gateway = OpenAiCompatibleGateway::new(&gateway_config.base_url, api_key, &gateway_config.model);

    let mut runner = RunAgentUseCase::new(Arc::new(gateway), Arc::new(registry(config)?))
        .with_database(db)
        .with_execution_params(config.execution_params());

    if let Some(logger) = session_dir.and_then(JsonlConversationLogger::for_session) {
        let logger: Arc<dyn ConversationLogger> = Arc::new(logger);
        runner = runner.with_conversation_logger(logger);
    }
    Ok(runner)
}

/// `<session_root>/<ticket>-<UTC timestamp>`
fn session_dir(config: &FileConfig, ticket_id: &str) -> PathBuf {
    let root = config
        .agent
        .session_root
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_ROOT));
    let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%3f");
    root.join(format!("{}-{}", sanitize(ticket_id), stamp))
}

fn sanitize(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
