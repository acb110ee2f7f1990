//! Shared helpers for tool use cases.

use board_domain::ToolCall;

/// Extract a short preview string from tool call arguments.
///
/// Looks for well-known keys (`path`, `command`, `pattern`, `state`,
/// `message`) first, then falls back to the first string value found.
pub(crate) fn tool_args_preview(call: &ToolCall) -> String {
    let Some(args) = call.arguments.as_object() else {
        return String::new();
    };
    let keys = ["path", "command", "pattern", "state", "message"];
    for key in &keys {
        if let Some(serde_json::Value::String(s)) = args.get(*key) {
            return truncate_preview(s, 50);
        }
    }
    // Fallback: first string value
    for value in args.values() {
        if let Some(s) = value.as_str() {
            return truncate_preview(s, 50);
        }
    }
    String::new()
}

fn truncate_preview(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_key_preferred() {
        let call = ToolCall::new("read_file", json!({"other": "ignored", "path": "src/main.rs"}));
        assert_eq!(tool_args_preview(&call), "src/main.rs");
    }

    #[test]
    fn test_fallback_to_first_string() {
        let call = ToolCall::new("save_document", json!({"doc_type": "research"}));
        assert_eq!(tool_args_preview(&call), "research");
    }

    #[test]
    fn test_long_value_truncated() {
        let long = "x".repeat(80);
        let call = ToolCall::new("run_command", json!({"command": long}));
        let preview = tool_args_preview(&call);
        assert_eq!(preview.chars().count(), 50);
        assert!(preview.ends_with('…'));
    }

    #[test]
    fn test_non_object_arguments() {
        let call = ToolCall::new("git_status", serde_json::Value::Null);
        assert_eq!(tool_args_preview(&call), "");
    }
}
