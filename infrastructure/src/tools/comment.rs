//! Comment tool: post_comment

use board_application::context::{ExecutionContext, parse_params};
use board_domain::{FieldKind, ObjectSchema, ToolDefinition, ToolError, ToolResult};
use serde::Deserialize;
use serde_json::{Value, json};

/// Tool name constant
pub const POST_COMMENT: &str = "post_comment";

pub fn post_comment_definition() -> ToolDefinition {
    ToolDefinition::new(
        POST_COMMENT,
        "Post a comment on a ticket as the acting persona",
        ObjectSchema::new()
            .required("content", FieldKind::String, "Comment text (markdown)")
            .optional(
                "ticket_id",
                FieldKind::String,
                "Ticket id; defaults to the ticket of the current run",
            ),
    )
}

#[derive(Debug, Deserialize)]
struct PostCommentParams {
    content: String,
    ticket_id: Option<String>,
}

pub struct PostCommentTool {
    definition: ToolDefinition,
}

impl PostCommentTool {
    pub fn new() -> Self {
        Self {
            definition: post_comment_definition(),
        }
    }

    async fn execute(&self, params: Value, ctx: &ExecutionContext) -> Result<ToolResult, ToolError> {
        let params: PostCommentParams = parse_params(&self.definition, &params)?;
        if params.content.trim().is_empty() {
            return Err(ToolError::invalid_argument("post_comment: content must not be empty"));
        }

        let persona_id = ctx.require_persona_id()?;
        let db = ctx.require_db()?;
        let ticket_id = ctx.resolve_ticket_id(params.ticket_id.as_deref())?;

        let comment = db
            .create_comment(&ticket_id, persona_id, &params.content)
            .await?;
        tracing::debug!(ticket_id = %ticket_id, comment_id = %comment.id, "Posted comment");

        Ok(ToolResult::success(
            POST_COMMENT,
            format!("Posted comment {} on {}", comment.id, ticket_id),
        )
        .with_extra(json!({ "comment_id": comment.id })))
    }
}

impl Default for PostCommentTool {
    fn default() -> Self {
        Self::new()
    }
}

impl_tool!(PostCommentTool);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryDatabase;
    use crate::tools::test_support::{context, workspace_in};
    use board_application::ports::database::DatabaseOperations;
    use board_application::ports::tool_executor::Tool;
    use board_domain::Ticket;
    use std::sync::Arc;

    async fn db() -> Arc<InMemoryDatabase> {
        let db = Arc::new(InMemoryDatabase::new());
        db.insert_ticket(Ticket::new("T-1", "P-1", "Add login")).await;
        db
    }

    #[tokio::test]
    async fn test_post_comment_as_persona() {
        let dir = tempfile::tempdir().unwrap();
        let db = db().await;
        let ctx = context(
            workspace_in(dir.path(), Some("dev-1")),
            Some(db.clone() as Arc<dyn DatabaseOperations>),
        );

        let result = PostCommentTool::new()
            .handle(json!({"content": "Looks good"}), &ctx)
            .await;

        assert!(result.is_success());
        let comments = db.comments_for("T-1").await;
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].persona_id, "dev-1");
        assert_eq!(comments[0].content, "Looks good");
    }

    #[tokio::test]
    async fn test_missing_persona_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let db = db().await;
        let ctx = context(
            workspace_in(dir.path(), None),
            Some(db.clone() as Arc<dyn DatabaseOperations>),
        );

        let result = PostCommentTool::new()
            .handle(json!({"content": "hello"}), &ctx)
            .await;

        let err = result.error().unwrap();
        assert_eq!(err.code, "MISSING_CONTEXT");
        assert!(err.message.contains("persona"));
        assert!(db.comments_for("T-1").await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_ticket_reports_backend_message() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(
            workspace_in(dir.path(), Some("dev-1")),
            Some(db().await as Arc<dyn DatabaseOperations>),
        );

        let result = PostCommentTool::new()
            .handle(json!({"content": "hi", "ticket_id": "T-9"}), &ctx)
            .await;

        let err = result.error().unwrap();
        assert_eq!(err.code, "NOT_FOUND");
        assert!(err.message.contains("T-9"));
    }
}
