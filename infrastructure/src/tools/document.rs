//! Document tool: save_document

use board_application::context::{ExecutionContext, parse_params};
use board_application::ports::database::NewDocument;
use board_domain::{
    DocumentType, FieldKind, ObjectSchema, ToolDefinition, ToolError, ToolResult,
};
use serde::Deserialize;
use serde_json::{Value, json};

/// Tool name constant
pub const SAVE_DOCUMENT: &str = "save_document";

pub fn save_document_definition() -> ToolDefinition {
    ToolDefinition::new(
        SAVE_DOCUMENT,
        "Save a research, implementation plan or design document on a ticket",
        ObjectSchema::new()
            .required(
                "doc_type",
                FieldKind::enumeration(DocumentType::names()),
                "Kind of document",
            )
            .required("content", FieldKind::String, "Document body (markdown)")
            .optional(
                "ticket_id",
                FieldKind::String,
                "Ticket id; defaults to the ticket of the current run",
            ),
    )
}

#[derive(Debug, Deserialize)]
struct SaveDocumentParams {
    doc_type: DocumentType,
    content: String,
    ticket_id: Option<String>,
}

pub struct SaveDocumentTool {
    definition: ToolDefinition,
}

impl SaveDocumentTool {
    pub fn new() -> Self {
        Self {
            definition: save_document_definition(),
        }
    }

    async fn execute(&self, params: Value, ctx: &ExecutionContext) -> Result<ToolResult, ToolError> {
        let params: SaveDocumentParams = parse_params(&self.definition, &params)?;
        let persona_id = ctx.require_persona_id()?;
        let db = ctx.require_db()?;
        let ticket_id = ctx.resolve_ticket_id(params.ticket_id.as_deref())?;

        let document = db
            .save_document(NewDocument {
                ticket_id: ticket_id.clone(),
                doc_type: params.doc_type,
                content: params.content,
                author_persona_id: persona_id.to_string(),
            })
            .await?;

        Ok(ToolResult::success(
            SAVE_DOCUMENT,
            format!(
                "Saved {} document {} on {}",
                document.doc_type, document.id, ticket_id
            ),
        )
        .with_bytes(document.content.len())
        .with_extra(json!({ "document_id": document.id })))
    }
}

impl Default for SaveDocumentTool {
    fn default() -> Self {
        Self::new()
    }
}

impl_tool!(SaveDocumentTool);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryDatabase;
    use crate::tools::test_support::{context, workspace_in};
    use board_application::ports::database::DatabaseOperations;
    use board_application::ports::tool_executor::Tool;
    use board_domain::Ticket;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_save_document_tags_author() {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(InMemoryDatabase::new());
        db.insert_ticket(Ticket::new("T-1", "P-1", "Add login")).await;
        let ctx = context(
            workspace_in(dir.path(), Some("researcher-1")),
            Some(db.clone() as Arc<dyn DatabaseOperations>),
        );

        let result = SaveDocumentTool::new()
            .handle(
                json!({"doc_type": "implementation_plan", "content": "# Plan"}),
                &ctx,
            )
            .await;

        assert!(result.is_success(), "{:?}", result.error());
        let docs = db.documents_for("T-1").await;
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].doc_type, DocumentType::ImplementationPlan);
        assert_eq!(docs[0].author_persona_id, "researcher-1");
    }

    #[tokio::test]
    async fn test_invalid_doc_type() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(workspace_in(dir.path(), Some("r-1")), None);

        let result = SaveDocumentTool::new()
            .handle(json!({"doc_type": "memo", "content": "x"}), &ctx)
            .await;

        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
    }

    #[tokio::test]
    async fn test_missing_db() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(workspace_in(dir.path(), Some("r-1")), None);

        let result = SaveDocumentTool::new()
            .handle(json!({"doc_type": "design", "content": "x"}), &ctx)
            .await;

        let err = result.error().unwrap();
        assert_eq!(err.code, "MISSING_CONTEXT");
        assert!(err.message.contains("database"));
    }
}
