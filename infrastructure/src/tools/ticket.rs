//! Ticket tools: get_ticket, update_ticket_state
//!
//! State changes go through the [`TicketStateMachine`]; this module never
//! writes a state directly.

use board_application::context::{ExecutionContext, parse_params};
use board_application::use_cases::transition_ticket::TicketStateMachine;
use board_domain::{FieldKind, ObjectSchema, TicketState, ToolDefinition, ToolError, ToolResult};
use serde::Deserialize;
use serde_json::{Value, json};

/// Tool name constants
pub const GET_TICKET: &str = "get_ticket";
pub const UPDATE_TICKET_STATE: &str = "update_ticket_state";

const TICKET_ID_HELP: &str = "Ticket id; defaults to the ticket of the current run";

pub fn get_ticket_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_TICKET,
        "Get a ticket's title, description, acceptance criteria and state",
        ObjectSchema::new().optional("ticket_id", FieldKind::String, TICKET_ID_HELP),
    )
}

pub fn update_ticket_state_definition() -> ToolDefinition {
    ToolDefinition::new(
        UPDATE_TICKET_STATE,
        "Move a ticket to another lifecycle state. Only transitions allowed by the lifecycle are accepted.",
        ObjectSchema::new()
            .required(
                "state",
                FieldKind::enumeration(TicketState::names()),
                "Target state",
            )
            .optional("ticket_id", FieldKind::String, TICKET_ID_HELP),
    )
}

#[derive(Debug, Deserialize)]
struct GetTicketParams {
    ticket_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdateTicketStateParams {
    state: String,
    ticket_id: Option<String>,
}

pub struct GetTicketTool {
    definition: ToolDefinition,
}

impl GetTicketTool {
    pub fn new() -> Self {
        Self {
            definition: get_ticket_definition(),
        }
    }

    async fn execute(&self, params: Value, ctx: &ExecutionContext) -> Result<ToolResult, ToolError> {
        let params: GetTicketParams = parse_params(&self.definition, &params)?;
        let db = ctx.require_db()?;
        let ticket_id = ctx.resolve_ticket_id(params.ticket_id.as_deref())?;

        let ticket = db
            .get_ticket(&ticket_id)
            .await?
            .ok_or_else(|| ToolError::not_found(format!("ticket {}", ticket_id)))?;

        let output = serde_json::to_string_pretty(&ticket)
            .map_err(|e| ToolError::execution_failed(e.to_string()))?;
        Ok(ToolResult::success(GET_TICKET, output).with_extra(json!({ "state": ticket.state })))
    }
}

impl Default for GetTicketTool {
    fn default() -> Self {
        Self::new()
    }
}

pub struct UpdateTicketStateTool {
    definition: ToolDefinition,
    state_machine: TicketStateMachine,
}

impl UpdateTicketStateTool {
    pub fn new(state_machine: TicketStateMachine) -> Self {
        Self {
            definition: update_ticket_state_definition(),
            state_machine,
        }
    }

    async fn execute(&self, params: Value, ctx: &ExecutionContext) -> Result<ToolResult, ToolError> {
        let params: UpdateTicketStateParams = parse_params(&self.definition, &params)?;
        let to: TicketState = params
            .state
            .parse()
            .map_err(|e: board_domain::DomainError| ToolError::invalid_argument(e.to_string()))?;
        let db = ctx.require_db()?;
        let ticket_id = ctx.resolve_ticket_id(params.ticket_id.as_deref())?;

        let ticket = self
            .state_machine
            .transition(db.as_ref(), &ticket_id, to)
            .await?;

        Ok(ToolResult::success(
            UPDATE_TICKET_STATE,
            format!("Ticket {} is now {}", ticket.id, ticket.state),
        )
        .with_extra(json!({ "ticket_id": ticket.id, "state": ticket.state })))
    }
}

impl_tool!(GetTicketTool, UpdateTicketStateTool);
