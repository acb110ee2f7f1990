//! Child-process runner.
//!
//! [`ProcessAgentRunner`] relocates the run loop into a worker process
//! (normally `agent-board worker`) and speaks the [`wire`](super::wire)
//! protocol with it. The worker is killed once `max_duration + grace` has
//! passed, and on Linux it is also told to die with its parent.

use super::wire::{RunRequest, parse_result};
use async_trait::async_trait;
use board_application::ports::agent_runner::{AgentRunParams, AgentRunner};
use board_domain::core::string::truncate;
use board_domain::{AgentRunResult, RunComment, TokenUsage};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Headroom past the run budget for the worker to report its own timeout
const DEFAULT_GRACE: Duration = Duration::from_secs(10);

/// Cap on worker stderr echoed into an error result
const STDERR_TAIL: usize = 2000;

pub struct ProcessAgentRunner {
    program: PathBuf,
    args: Vec<String>,
    grace: Duration,
}

impl ProcessAgentRunner {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            grace: DEFAULT_GRACE,
        }
    }

    /// Run the current executable's hidden `worker` subcommand.
    pub fn current_exe(extra_args: Vec<String>) -> std::io::Result<Self> {
        let mut args = extra_args;
        args.push("worker".to_string());
        Ok(Self::new(std::env::current_exe()?, args))
    }

    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Linux: have the kernel SIGTERM the worker if we die first, which
        // covers the cases where kill_on_drop never runs (SIGKILL, OOM).
        #[cfg(target_os = "linux")]
        unsafe {
            cmd.pre_exec(|| {
                libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM);
                Ok(())
            });
        }
        cmd
    }

    async fn run_worker(&self, params: &AgentRunParams, started: Instant) -> AgentRunResult {
        let elapsed = || started.elapsed().as_millis() as u64;
        let fail = |message: String| {
            warn!(program = %self.program.display(), "{}", message);
            AgentRunResult::failed(
                message.clone(),
                vec![RunComment::status(format!("Run failed: {}", message))],
                TokenUsage::default(),
                elapsed(),
            )
        };

        let request = match serde_json::to_vec(&RunRequest::from_params(params)) {
            Ok(bytes) => bytes,
            Err(e) => return fail(format!("failed to encode run request: {}", e)),
        };

        let mut child = match self.command().spawn() {
            Ok(child) => child,
            Err(e) => return fail(format!("failed to spawn worker: {}", e)),
        };
        debug!(pid = child.id(), "Worker spawned");

        // Feed stdin while draining stdout/stderr so neither side can block
        // the other on a full pipe.
        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                // A worker that exits early closes the pipe; its exit status
                // says more than the write error would.
                if let Err(e) = stdin.write_all(&request).await {
                    debug!(error = %e, "Could not write run request");
                }
            }
        };
        let exchange = async {
            let ((), output) = tokio::join!(feed, child.wait_with_output());
            output
        };

        let budget = params.max_duration.saturating_add(self.grace);
        let output = match tokio::time::timeout(budget, exchange).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return fail(format!("failed to wait for worker: {}", e)),
            Err(_) => {
                warn!(budget_secs = budget.as_secs(), "Worker exceeded its budget, killed");
                return AgentRunResult::timeout(
                    vec![RunComment::status(format!(
                        "Run stopped after exceeding its {}s time budget; the worker was killed.",
                        params.max_duration.as_secs()
                    ))],
                    TokenUsage::default(),
                    elapsed(),
                );
            }
        };

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return fail(format!(
                "worker exited with {}: {}",
                output.status,
                truncate(stderr.trim(), STDERR_TAIL)
            ));
        }

        match parse_result(&String::from_utf8_lossy(&output.stdout)) {
            Ok(result) => result,
            Err(e) => fail(format!("unparsable worker output: {}", e)),
        }
    }
}

#[async_trait]
impl AgentRunner for ProcessAgentRunner {
    async fn run(&self, params: AgentRunParams) -> AgentRunResult {
        let started = Instant::now();
        info!(
            program = %self.program.display(),
            ticket = params.ticket_id.as_deref().unwrap_or("-"),
            profile = %params.profile,
            "Dispatching run to worker"
        );
        let result = self.run_worker(&params, started).await;
        info!(status = %result.status, duration_ms = result.duration_ms, "Worker run finished");
        result
    }
}
