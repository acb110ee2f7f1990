//! Run Agent use case: the in-process agent runner.
//!
//! Drives one run of the reasoning/tool-call loop:
//!
//! ```text
//! Pending ─▶ Running ─▶ create session ─▶ send task ──┐
//!                          ▲                          ▼
//!                          │              tool calls? ── no ──▶ parse result block ─▶ Completed/Blocked
//!                          │                          │ yes
//!                          └── send results ◀── execute sequentially
//!                                                  (allowlist, deadline between calls)
//! ```
//!
//! Every exit path produces exactly one [`AgentRunResult`]: exceeding the
//! duration budget yields `timeout`, gateway failures, the tool-turn limit
//! and panics yield `error`.

mod types;

pub use types::RunAgentError;

use types::RunProgress;

use crate::config::ExecutionParams;
use crate::context::ExecutionContext;
use crate::ports::agent_runner::{AgentRunParams, AgentRunner};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::database::DatabaseOperations;
use crate::ports::llm_gateway::{LlmGateway, ToolResultMessage};
use crate::ports::tool_executor::ToolExecutorPort;
use crate::use_cases::shared::{check_deadline, deadline_after, with_deadline};
use crate::use_cases::tool_helpers::tool_args_preview;
use async_trait::async_trait;
use board_domain::core::string::truncate;
use board_domain::{
    AgentPromptTemplate, AgentRunResult, LlmResponse, RunComment, RunOutcome, RunPhase,
    Ticket, ToolError, ToolResult, parse_run_outcome,
};
use futures::FutureExt;
use serde_json::json;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{Instrument, debug, info, info_span, warn};

/// Use case for running an agent in-process
pub struct RunAgentUseCase<G: LlmGateway + 'static, T: ToolExecutorPort + 'static> {
    gateway: Arc<G>,
    tool_executor: Arc<T>,
    db: Option<Arc<dyn DatabaseOperations>>,
    conversation_logger: Arc<dyn ConversationLogger>,
    execution_params: ExecutionParams,
}

impl<G, T> Clone for RunAgentUseCase<G, T>
where
    G: LlmGateway + 'static,
    T: ToolExecutorPort + 'static,
{
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            tool_executor: self.tool_executor.clone(),
            db: self.db.clone(),
            conversation_logger: self.conversation_logger.clone(),
            execution_params: self.execution_params.clone(),
        }
    }
}

impl<G: LlmGateway + 'static, T: ToolExecutorPort + 'static> RunAgentUseCase<G, T> {
    pub fn new(gateway: Arc<G>, tool_executor: Arc<T>) -> Self {
        Self {
            gateway,
            tool_executor,
            db: None,
            conversation_logger: Arc::new(NoConversationLogger),
            execution_params: ExecutionParams::default(),
        }
    }

    /// Database handed to tools through the execution context
    pub fn with_database(mut self, db: Arc<dyn DatabaseOperations>) -> Self {
        self.db = Some(db);
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn with_execution_params(mut self, params: ExecutionParams) -> Self {
        self.execution_params = params;
        self
    }

    /// The loop proper. Errors here are folded into the result by `run`.
    async fn drive(
        &self,
        params: &AgentRunParams,
        deadline: Instant,
        progress: &mut RunProgress,
    ) -> Result<RunOutcome, RunAgentError> {
        check_deadline(deadline)?;

        let ticket = self.fetch_ticket(params).await;
        let tools = self.tool_executor.tools_for_profile(&params.profile);
        let surfaces = self.tool_executor.tool_surfaces_for_profile(&params.profile);
        let allowed: HashSet<&str> = surfaces.iter().map(|s| s.name.as_str()).collect();

        let definitions: Vec<_> = tools.iter().map(|t| t.definition()).collect();
        let system_prompt =
            AgentPromptTemplate::system(&params.system_prompt, &params.workflow, &definitions);

        let ctx = ExecutionContext::builder(&params.project_id, params.workspace.clone())
            .maybe_ticket_id(params.ticket_id.clone())
            .maybe_db(self.db.clone())
            .profile(&params.profile)
            .build();

        let session = with_deadline(deadline, self.gateway.create_session(&system_prompt)).await?;

        let prompt = AgentPromptTemplate::task(&params.task, ticket.as_ref());
        let mut response =
            with_deadline(deadline, session.send_with_tools(&prompt, &surfaces)).await?;
        let max_turns = self.execution_params.max_tool_turns;
        let mut turn_count = 0;

        loop {
            self.record_response(&response, progress);

            let tool_calls = response.tool_calls();
            if tool_calls.is_empty() {
                let text = response.text_content();
                return Ok(parse_run_outcome(&text)
                    .unwrap_or_else(|| RunOutcome::from_plain_text(&text)));
            }

            turn_count += 1;
            if turn_count > max_turns {
                warn!("Tool use loop exceeded max_tool_turns ({})", max_turns);
                return Err(RunAgentError::MaxToolTurnsExceeded(max_turns));
            }

            let mut tool_result_messages = Vec::with_capacity(tool_calls.len());
            for (index, call) in tool_calls.iter().enumerate() {
                // Cooperative cancellation: never start a call past the deadline.
                check_deadline(deadline)?;

                info!(
                    tool = %call.tool_name,
                    preview = %tool_args_preview(call),
                    "Tool call"
                );
                self.conversation_logger.log(ConversationEvent::new(
                    "tool_call",
                    json!({
                        "tool": call.tool_name,
                        "call_id": call.call_id,
                        "arguments": call.arguments,
                    }),
                ));

                let result = if allowed.contains(call.tool_name.as_str()) {
                    self.tool_executor.execute(call, &ctx).await
                } else {
                    warn!(tool = %call.tool_name, profile = %params.profile, "Tool not in allowlist");
                    ToolResult::failure(
                        &call.tool_name,
                        ToolError::permission_denied(format!(
                            "tool '{}' is not available to profile '{}'",
                            call.tool_name, params.profile
                        )),
                    )
                };
                progress.tool_calls += 1;
                self.record_tool_result(&result);

                tool_result_messages.push(ToolResultMessage {
                    tool_use_id: call
                        .call_id
                        .clone()
                        .unwrap_or_else(|| format!("call_{}_{}", turn_count, index)),
                    tool_name: call.tool_name.clone(),
                    output: result.to_model_content(),
                    is_error: !result.is_success(),
                });
            }

            check_deadline(deadline)?;
            debug!(
                "Tool use turn {}/{}: sending {} tool results",
                turn_count,
                max_turns,
                tool_result_messages.len()
            );
            response =
                with_deadline(deadline, session.send_tool_results(&tool_result_messages)).await?;
        }
    }

    /// Ticket details for the first prompt. Absence is not fatal.
    async fn fetch_ticket(&self, params: &AgentRunParams) -> Option<Ticket> {
        let (db, ticket_id) = (self.db.as_ref()?, params.ticket_id.as_deref()?);
        match db.get_ticket(ticket_id).await {
            Ok(ticket) => ticket,
            Err(e) => {
                warn!(ticket_id, "Could not load ticket for prompt context: {}", e);
                None
            }
        }
    }

    fn record_response(&self, response: &LlmResponse, progress: &mut RunProgress) {
        progress.tokens.add(response.usage);
        progress.model_turns += 1;
        let text = response.text_content();
        debug!(
            turn = progress.model_turns,
            tool_calls = response.tool_calls().len(),
            input_tokens = response.usage.input,
            output_tokens = response.usage.output,
            "Model response"
        );
        self.conversation_logger.log(ConversationEvent::new(
            "llm_response",
            json!({
                "turn": progress.model_turns,
                "text": text,
                "tool_calls": response.tool_calls().iter().map(|c| &c.tool_name).collect::<Vec<_>>(),
                "usage": response.usage,
            }),
        ));
    }

    fn record_tool_result(&self, result: &ToolResult) {
        if let Some(err) = result.error() {
            warn!(tool = %result.tool_name, code = %err.code, "Tool failed: {}", err.message);
        }
        self.conversation_logger.log(ConversationEvent::new(
            "tool_result",
            json!({
                "tool": result.tool_name,
                "success": result.is_success(),
                "error": result.error(),
                "output_preview": truncate(&result.output, 500),
                "metadata": result.metadata,
            }),
        ));
    }
}

#[async_trait]
impl<G, T> AgentRunner for RunAgentUseCase<G, T>
where
    G: LlmGateway + 'static,
    T: ToolExecutorPort + 'static,
{
    async fn run(&self, params: AgentRunParams) -> AgentRunResult {
        let started = Instant::now();
        let deadline = deadline_after(started, params.max_duration);
        let mut phase = RunPhase::Pending;
        let mut progress = RunProgress::default();

        let span = info_span!(
            "agent_run",
            project = %params.project_id,
            ticket = params.ticket_id.as_deref().unwrap_or("-"),
            profile = %params.profile,
        );

        debug_assert!(phase.can_advance_to(RunPhase::Running));
        phase = RunPhase::Running;
        info!(parent: &span, max_duration_secs = params.max_duration.as_secs(), "Run started");
        self.conversation_logger.log(ConversationEvent::new(
            "run_started",
            json!({
                "project_id": params.project_id,
                "ticket_id": params.ticket_id,
                "profile": params.profile,
                "model": self.gateway.model_name(),
                "task": params.task,
                "session_dir": params.session_dir,
                "max_duration_ms": u64::try_from(params.max_duration.as_millis()).unwrap_or(u64::MAX),
            }),
        ));

        let outcome = AssertUnwindSafe(self.drive(&params, deadline, &mut progress))
            .catch_unwind()
            .instrument(span.clone())
            .await
            .unwrap_or_else(|panic| Err(RunAgentError::Panicked(panic_message(panic))));

        let duration_ms = started.elapsed().as_millis() as u64;
        let result = match outcome {
            Ok(outcome) => AgentRunResult::from_outcome(outcome, progress.tokens, duration_ms),
            Err(RunAgentError::Timeout) => AgentRunResult::timeout(
                vec![RunComment::status(format!(
                    "Run stopped after exceeding its {}s time budget ({} model turns, {} tool calls).",
                    params.max_duration.as_secs(),
                    progress.model_turns,
                    progress.tool_calls
                ))],
                progress.tokens,
                duration_ms,
            ),
            Err(e) => AgentRunResult::failed(
                e.to_string(),
                vec![RunComment::status(format!("Run failed: {}", e))],
                progress.tokens,
                duration_ms,
            ),
        };

        let next = RunPhase::from(result.status);
        debug_assert!(phase.can_advance_to(next));
        phase = next;

        info!(
            parent: &span,
            status = %result.status,
            phase = ?phase,
            duration_ms,
            input_tokens = result.tokens_used.input,
            output_tokens = result.tokens_used.output,
            "Run finished"
        );
        self.conversation_logger.log(ConversationEvent::new(
            "run_finished",
            json!({
                "status": result.status,
                "error": result.error,
                "comments": result.comments,
                "ticket_state_change": result.ticket_state_change,
                "tokens_used": result.tokens_used,
                "duration_ms": duration_ms,
            }),
        ));

        result
    }
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::workspace;
    use crate::ports::conversation_logger::RecordingConversationLogger;
    use crate::ports::llm_gateway::{GatewayError, LlmSession};
    use crate::ports::tool_executor::Tool;
    use crate::ports::tool_schema::ToolSurface;
    use crate::use_cases::transition_ticket::test_support::RecordingDb;
    use board_domain::{
        ContentBlock, ObjectSchema, RunStatus, StopReason, TicketState, TokenUsage, ToolCall,
        ToolDefinition,
    };
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::time::Duration;

    // ==================== Flow Test Infrastructure ====================

    /// A scripted response for the mock session
    #[derive(Debug, Clone)]
    enum ScriptedResponse {
        Response(LlmResponse),
        /// Wait before answering
        Delayed(Duration, LlmResponse),
        Error(String),
    }

    /// Mock session that returns scripted responses in order
    struct ScriptedSession {
        responses: Arc<Mutex<VecDeque<ScriptedResponse>>>,
        sent_results: Arc<Mutex<Vec<ToolResultMessage>>>,
    }

    impl ScriptedSession {
        async fn next_response(&self) -> Result<LlmResponse, GatewayError> {
            let next = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(ScriptedResponse::Response(LlmResponse::from_text(
                    "(no more responses)",
                )));
            match next {
                ScriptedResponse::Response(r) => Ok(r),
                ScriptedResponse::Delayed(delay, r) => {
                    tokio::time::sleep(delay).await;
                    Ok(r)
                }
                ScriptedResponse::Error(e) => Err(GatewayError::RequestFailed(e)),
            }
        }
    }

    #[async_trait]
    impl LlmSession for ScriptedSession {
        async fn send_with_tools(
            &self,
            _content: &str,
            _tools: &[ToolSurface],
        ) -> Result<LlmResponse, GatewayError> {
            self.next_response().await
        }

        async fn send_tool_results(
            &self,
            results: &[ToolResultMessage],
        ) -> Result<LlmResponse, GatewayError> {
            self.sent_results
                .lock()
                .unwrap()
                .extend(results.iter().cloned());
            self.next_response().await
        }
    }

    /// Mock gateway handing out one scripted session
    struct ScriptedGateway {
        responses: Arc<Mutex<VecDeque<ScriptedResponse>>>,
        sent_results: Arc<Mutex<Vec<ToolResultMessage>>>,
        sessions_created: Mutex<usize>,
    }

    impl ScriptedGateway {
        fn new(responses: Vec<ScriptedResponse>) -> Self {
            Self {
                responses: Arc::new(Mutex::new(responses.into())),
                sent_results: Arc::new(Mutex::new(Vec::new())),
                sessions_created: Mutex::new(0),
            }
        }

        fn sent_results(&self) -> Vec<ToolResultMessage> {
            self.sent_results.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        async fn create_session(
            &self,
            _system_prompt: &str,
        ) -> Result<Box<dyn LlmSession>, GatewayError> {
            *self.sessions_created.lock().unwrap() += 1;
            Ok(Box::new(ScriptedSession {
                responses: self.responses.clone(),
                sent_results: self.sent_results.clone(),
            }))
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    struct NamedTool {
        definition: ToolDefinition,
    }

    #[async_trait]
    impl Tool for NamedTool {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn handle(&self, _params: serde_json::Value, _ctx: &ExecutionContext) -> ToolResult {
            ToolResult::success(self.definition.name(), "unused")
        }
    }

    /// Records executed calls; `explode` panics, `slow` sleeps
    struct FakeTools {
        tools: Vec<Arc<dyn Tool>>,
        profiles: HashMap<String, Vec<String>>,
        executed: Mutex<Vec<String>>,
    }

    impl FakeTools {
        fn new(names: &[&str], profile: &[&str]) -> Self {
            let tools = names
                .iter()
                .map(|n| {
                    Arc::new(NamedTool {
                        definition: ToolDefinition::new(*n, format!("{} tool", n), ObjectSchema::new()),
                    }) as Arc<dyn Tool>
                })
                .collect();
            let profiles = HashMap::from([(
                "developer".to_string(),
                profile.iter().map(|s| s.to_string()).collect(),
            )]);
            Self {
                tools,
                profiles,
                executed: Mutex::new(Vec::new()),
            }
        }

        fn executed(&self) -> Vec<String> {
            self.executed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ToolExecutorPort for FakeTools {
        fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
            self.tools.iter().find(|t| t.name() == name).cloned()
        }

        fn all_tool_names(&self) -> Vec<String> {
            self.tools.iter().map(|t| t.name().to_string()).collect()
        }

        fn tools_for_profile(&self, profile: &str) -> Vec<Arc<dyn Tool>> {
            self.profiles
                .get(profile)
                .map(|names| names.iter().filter_map(|n| self.get_tool(n)).collect())
                .unwrap_or_default()
        }

        fn tool_surfaces_for_profile(&self, profile: &str) -> Vec<ToolSurface> {
            self.tools_for_profile(profile)
                .iter()
                .map(|t| ToolSurface {
                    name: t.name().to_string(),
                    description: t.definition().description().to_string(),
                    parameters: json!({"type": "object", "properties": {}}),
                })
                .collect()
        }

        async fn execute(&self, call: &ToolCall, _ctx: &ExecutionContext) -> ToolResult {
            self.executed.lock().unwrap().push(call.tool_name.clone());
            match call.tool_name.as_str() {
                "explode" => panic!("tool blew up"),
                "slow" => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    ToolResult::success("slow", "finally")
                }
                name => ToolResult::success(name, format!("ok:{}", name)),
            }
        }
    }

    fn tool_use(id: &str, name: &str) -> ContentBlock {
        ContentBlock::ToolUse {
            id: id.to_string(),
            name: name.to_string(),
            input: json!({}),
        }
    }

    fn tool_response(calls: Vec<ContentBlock>, usage: TokenUsage) -> ScriptedResponse {
        ScriptedResponse::Response(LlmResponse {
            content: calls,
            stop_reason: Some(StopReason::ToolUse),
            model: None,
            usage,
        })
    }

    fn final_text(text: &str, usage: TokenUsage) -> ScriptedResponse {
        ScriptedResponse::Response(LlmResponse::from_text(text).with_usage(usage))
    }

    fn params(max_duration: Duration) -> AgentRunParams {
        AgentRunParams {
            project_id: "P-1".to_string(),
            ticket_id: Some("T-1".to_string()),
            profile: "developer".to_string(),
            task: "Implement the endpoint".to_string(),
            system_prompt: "You are a developer.".to_string(),
            workflow: String::new(),
            workspace: workspace(Some("dev-1")),
            session_dir: None,
            max_duration,
        }
    }

    const RESULT_BLOCK: &str = "Done.\n\n```result\n{\"status\": \"completed\", \"comments\": [{\"type\": \"completion\", \"content\": \"Endpoint added\"}], \"ticket_state_change\": \"verification\"}\n```";

    // ==================== Flow Tests ====================

    #[tokio::test]
    async fn test_completed_run_with_state_change() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            tool_response(
                vec![tool_use("c1", "read_file"), tool_use("c2", "write_file")],
                TokenUsage::new(100, 20),
            ),
            final_text(RESULT_BLOCK, TokenUsage::new(150, 40)),
        ]));
        let tools = Arc::new(FakeTools::new(
            &["read_file", "write_file"],
            &["read_file", "write_file"],
        ));
        let db = Arc::new(RecordingDb::with_ticket(
            Ticket::new("T-1", "P-1", "Endpoint").with_state(TicketState::InProgress),
        ));
        let runner = RunAgentUseCase::new(gateway.clone(), tools.clone()).with_database(db);

        let result = runner.run(params(Duration::from_secs(60))).await;

        assert_eq!(result.status, RunStatus::Completed);
        assert_eq!(result.comments, vec![RunComment::completion("Endpoint added")]);
        assert_eq!(result.ticket_state_change, Some(TicketState::Verification));
        assert_eq!(result.tokens_used, TokenUsage::new(250, 60));
        assert_eq!(tools.executed(), vec!["read_file", "write_file"]);

        let sent = gateway.sent_results();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].tool_use_id, "c1");
        assert_eq!(sent[0].output, "ok:read_file");
        assert!(!sent[1].is_error);
    }

    #[tokio::test]
    async fn test_tool_outside_allowlist_is_denied_without_executing() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            tool_response(vec![tool_use("c1", "git_push")], TokenUsage::default()),
            final_text("Could not push.", TokenUsage::default()),
        ]));
        let tools = Arc::new(FakeTools::new(&["read_file", "git_push"], &["read_file"]));
        let runner = RunAgentUseCase::new(gateway.clone(), tools.clone());

        let result = runner.run(params(Duration::from_secs(60))).await;

        assert_eq!(result.status, RunStatus::Completed);
        assert!(tools.executed().is_empty());
        let sent = gateway.sent_results();
        assert!(sent[0].is_error);
        assert!(sent[0].output.contains("PERMISSION_DENIED"));
    }

    #[tokio::test]
    async fn test_unbounded_duration_still_produces_a_result() {
        let gateway = Arc::new(ScriptedGateway::new(vec![final_text(
            RESULT_BLOCK,
            TokenUsage::new(10, 10),
        )]));
        let tools = Arc::new(FakeTools::new(&[], &[]));
        let runner = RunAgentUseCase::new(gateway, tools);

        let result = runner.run(params(Duration::from_secs(u64::MAX))).await;

        assert_eq!(result.status, RunStatus::Completed);
        assert_eq!(result.ticket_state_change, Some(TicketState::Verification));
    }

    #[tokio::test]
    async fn test_zero_duration_times_out_before_any_model_call() {
        let gateway = Arc::new(ScriptedGateway::new(vec![final_text(
            RESULT_BLOCK,
            TokenUsage::new(10, 10),
        )]));
        let tools = Arc::new(FakeTools::new(&[], &[]));
        let runner = RunAgentUseCase::new(gateway.clone(), tools);

        let result = runner.run(params(Duration::ZERO)).await;

        assert_eq!(result.status, RunStatus::Timeout);
        assert_eq!(result.tokens_used, TokenUsage::default());
        assert!(result.ticket_state_change.is_none());
        assert_eq!(result.comments.len(), 1);
        assert_eq!(*gateway.sessions_created.lock().unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_model_times_out_keeping_accrued_tokens() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            tool_response(vec![tool_use("c1", "read_file")], TokenUsage::new(50, 5)),
            ScriptedResponse::Delayed(
                Duration::from_secs(120),
                LlmResponse::from_text(RESULT_BLOCK).with_usage(TokenUsage::new(99, 99)),
            ),
        ]));
        let tools = Arc::new(FakeTools::new(&["read_file"], &["read_file"]));
        let runner = RunAgentUseCase::new(gateway, tools);

        let result = runner.run(params(Duration::from_secs(10))).await;

        assert_eq!(result.status, RunStatus::Timeout);
        assert_eq!(result.tokens_used, TokenUsage::new(50, 5));
        assert!(result.ticket_state_change.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_tool_finishes_then_run_times_out() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            tool_response(
                vec![tool_use("c1", "slow"), tool_use("c2", "read_file")],
                TokenUsage::new(5, 5),
            ),
            final_text(RESULT_BLOCK, TokenUsage::default()),
        ]));
        let tools = Arc::new(FakeTools::new(&["slow", "read_file"], &["slow", "read_file"]));
        let runner = RunAgentUseCase::new(gateway, tools.clone());

        let result = runner.run(params(Duration::from_secs(10))).await;

        assert_eq!(result.status, RunStatus::Timeout);
        // The slow call ran to completion; the next one never started.
        assert_eq!(tools.executed(), vec!["slow"]);
    }

    #[tokio::test]
    async fn test_max_tool_turns_exceeded_is_error() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            tool_response(vec![tool_use("c1", "read_file")], TokenUsage::default()),
            tool_response(vec![tool_use("c2", "read_file")], TokenUsage::default()),
            tool_response(vec![tool_use("c3", "read_file")], TokenUsage::default()),
        ]));
        let tools = Arc::new(FakeTools::new(&["read_file"], &["read_file"]));
        let runner = RunAgentUseCase::new(gateway, tools.clone())
            .with_execution_params(ExecutionParams::default().with_max_tool_turns(2));

        let result = runner.run(params(Duration::from_secs(60))).await;

        assert_eq!(result.status, RunStatus::Error);
        assert!(result.error.unwrap().contains("maximum tool turns (2)"));
        assert_eq!(tools.executed().len(), 2);
    }

    #[tokio::test]
    async fn test_gateway_error_is_error_result() {
        let gateway = Arc::new(ScriptedGateway::new(vec![ScriptedResponse::Error(
            "503 Service Unavailable".to_string(),
        )]));
        let runner = RunAgentUseCase::new(gateway, Arc::new(FakeTools::new(&[], &[])));

        let result = runner.run(params(Duration::from_secs(60))).await;

        assert_eq!(result.status, RunStatus::Error);
        assert!(result.error.unwrap().contains("503"));
        assert!(result.ticket_state_change.is_none());
        assert_eq!(result.comments.len(), 1);
    }

    #[tokio::test]
    async fn test_panic_in_loop_is_caught() {
        let gateway = Arc::new(ScriptedGateway::new(vec![tool_response(
            vec![tool_use("c1", "explode")],
            TokenUsage::new(7, 3),
        )]));
        let tools = Arc::new(FakeTools::new(&["explode"], &["explode"]));
        let runner = RunAgentUseCase::new(gateway, tools);

        let result = runner.run(params(Duration::from_secs(60))).await;

        assert_eq!(result.status, RunStatus::Error);
        assert!(result.error.unwrap().contains("tool blew up"));
        assert_eq!(result.tokens_used, TokenUsage::new(7, 3));
    }

    #[tokio::test]
    async fn test_plain_final_text_becomes_completion_comment() {
        let gateway = Arc::new(ScriptedGateway::new(vec![final_text(
            "Investigated; nothing to change.",
            TokenUsage::new(1, 1),
        )]));
        let runner = RunAgentUseCase::new(gateway, Arc::new(FakeTools::new(&[], &[])));

        let result = runner.run(params(Duration::from_secs(60))).await;

        assert_eq!(result.status, RunStatus::Completed);
        assert_eq!(
            result.comments,
            vec![RunComment::completion("Investigated; nothing to change.")]
        );
        assert!(result.ticket_state_change.is_none());
    }

    #[tokio::test]
    async fn test_transcript_events() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            tool_response(vec![tool_use("c1", "read_file")], TokenUsage::default()),
            final_text(RESULT_BLOCK, TokenUsage::default()),
        ]));
        let logger = Arc::new(RecordingConversationLogger::new());
        let runner = RunAgentUseCase::new(
            gateway,
            Arc::new(FakeTools::new(&["read_file"], &["read_file"])),
        )
        .with_conversation_logger(logger.clone());

        runner.run(params(Duration::from_secs(60))).await;

        assert_eq!(
            logger.event_types(),
            vec![
                "run_started",
                "llm_response",
                "tool_call",
                "tool_result",
                "llm_response",
                "run_finished"
            ]
        );
    }
}
