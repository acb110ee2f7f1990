//! Prompt templates for agent runs

use crate::tool::entities::ToolDefinition;
use crate::ticket::entities::Ticket;
use crate::ticket::state::TicketState;

/// Templates for generating agent prompts
pub struct AgentPromptTemplate;

impl AgentPromptTemplate {
    /// System prompt for a run: the role's own prompt and workflow, the tools
    /// the role may call, and the result-block contract.
    pub fn system(base_prompt: &str, workflow: &str, tools: &[&ToolDefinition]) -> String {
        let tool_list = if tools.is_empty() {
            "(none)".to_string()
        } else {
            tools
                .iter()
                .map(|t| format!("- **{}**: {}", t.name(), t.description()))
                .collect::<Vec<_>>()
                .join("\n")
        };

        let states = TicketState::names().join(", ");

        let mut prompt = String::new();
        if !base_prompt.trim().is_empty() {
            prompt.push_str(base_prompt.trim());
            prompt.push_str("\n\n");
        }
        if !workflow.trim().is_empty() {
            prompt.push_str("## Workflow\n\n");
            prompt.push_str(workflow.trim());
            prompt.push_str("\n\n");
        }

        prompt.push_str(&format!(
            r#"## Available Tools

{tool_list}

Call tools through the function-calling interface only. Tool calls are executed
one at a time in the order you request them. A failed call returns an error
you can act on; fix the arguments and retry when the error says so.

## Finishing

When you are done, or cannot continue without a human, end your final message
with a result block:

```result
{{
  "status": "completed",
  "comments": [
    {{"type": "completion", "content": "What you did and what changed"}}
  ],
  "ticket_state_change": "verification"
}}
```

- `status` is `completed` when the task is finished, `blocked` when you need input
- comment `type` is one of `question`, `status`, `completion`; comments are posted in order
- `ticket_state_change` is optional and must be one of: {states}
- a requested state change is still checked against the ticket lifecycle
"#,
            tool_list = tool_list,
            states = states
        ));

        prompt
    }

    /// First user turn: the task, plus the ticket when one is known.
    pub fn task(task: &str, ticket: Option<&Ticket>) -> String {
        let Some(ticket) = ticket else {
            return format!("## Task\n\n{}", task.trim());
        };

        let mut out = format!(
            "## Ticket {}: {}\n\nCurrent state: {}\n",
            ticket.id, ticket.title, ticket.state
        );
        if !ticket.description.trim().is_empty() {
            out.push_str(&format!("\n### Description\n\n{}\n", ticket.description.trim()));
        }
        if !ticket.acceptance_criteria.trim().is_empty() {
            out.push_str(&format!(
                "\n### Acceptance Criteria\n\n{}\n",
                ticket.acceptance_criteria.trim()
            ));
        }
        out.push_str(&format!("\n## Task\n\n{}", task.trim()));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::schema::ObjectSchema;

    #[test]
    fn test_system_lists_tools_and_result_contract() {
        let read = ToolDefinition::new("read_file", "Read a file", ObjectSchema::new());
        let prompt =
            AgentPromptTemplate::system("You are a researcher.", "1. Read\n2. Report", &[&read]);

        assert!(prompt.starts_with("You are a researcher."));
        assert!(prompt.contains("## Workflow"));
        assert!(prompt.contains("- **read_file**: Read a file"));
        assert!(prompt.contains("```result"));
        assert!(prompt.contains("plan_approval"));
    }

    #[test]
    fn test_system_without_tools_or_workflow() {
        let prompt = AgentPromptTemplate::system("", "", &[]);
        assert!(prompt.starts_with("## Available Tools"));
        assert!(prompt.contains("(none)"));
        assert!(!prompt.contains("## Workflow"));
    }

    #[test]
    fn test_task_includes_ticket_details() {
        let ticket = Ticket::new("T-7", "P-1", "Add search")
            .with_description("Full-text search over tickets")
            .with_acceptance_criteria("- returns matches\n- paginates")
            .with_state(TicketState::Research);
        let prompt = AgentPromptTemplate::task("Research the options", Some(&ticket));

        assert!(prompt.contains("## Ticket T-7: Add search"));
        assert!(prompt.contains("Current state: research"));
        assert!(prompt.contains("### Acceptance Criteria"));
        assert!(prompt.ends_with("Research the options"));
    }

    #[test]
    fn test_task_without_ticket() {
        assert_eq!(
            AgentPromptTemplate::task("  Fix the build ", None),
            "## Task\n\nFix the build"
        );
    }
}
