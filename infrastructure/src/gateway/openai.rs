//! OpenAI-compatible chat completions gateway.
//!
//! Speaks `POST {base_url}/chat/completions` with function tools. Works with
//! any server that implements that surface (OpenAI, vLLM, Ollama, LiteLLM,
//! ...). Each [`OpenAiSession`] keeps its own message history; tool results
//! are sent back as `role: "tool"` messages keyed by `tool_call_id`.

use async_trait::async_trait;
use board_application::ports::llm_gateway::{
    GatewayError, LlmGateway, LlmSession, ToolResultMessage,
};
use board_application::ports::tool_schema::ToolSurface;
use board_domain::{ContentBlock, LlmResponse, StopReason, TokenUsage};
use reqwest::Client;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tracing::{debug, info};

pub struct OpenAiCompatibleGateway {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiCompatibleGateway {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            model: model.into(),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl LlmGateway for OpenAiCompatibleGateway {
    async fn create_session(
        &self,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        info!(model = %self.model, base_url = %self.base_url, "Creating session");
        Ok(Box::new(OpenAiSession {
            client: self.client.clone(),
            url: format!("{}/chat/completions", self.base_url),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            state: Mutex::new(SessionState {
                messages: vec![json!({"role": "system", "content": system_prompt})],
                tools: Vec::new(),
            }),
        }))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

struct SessionState {
    messages: Vec<Value>,
    /// Tools offered on the last user turn; reused for tool-result turns
    tools: Vec<Value>,
}

pub struct OpenAiSession {
    client: Client,
    url: String,
    api_key: Option<String>,
    model: String,
    state: Mutex<SessionState>,
}

impl OpenAiSession {
    /// Send the history, record the assistant reply, return it parsed.
    async fn complete(&self, state: &mut SessionState) -> Result<LlmResponse, GatewayError> {
        let mut body = json!({
            "model": self.model,
            "messages": state.messages,
        });
        if !state.tools.is_empty() {
            body["tools"] = json!(state.tools);
        }

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        debug!(messages = state.messages.len(), tools = state.tools.len(), "Sending completion request");
        let response = request.send().await.map_err(map_reqwest_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(GatewayError::RequestFailed(format!("{}: {}", status, text)));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        let (assistant, parsed) = parse_completion(&payload)?;
        state.messages.push(assistant);
        Ok(parsed)
    }
}

#[async_trait]
impl LlmSession for OpenAiSession {
    async fn send_with_tools(
        &self,
        content: &str,
        tools: &[ToolSurface],
    ) -> Result<LlmResponse, GatewayError> {
        let mut state = self.state.lock().await;
        state.tools = tools.iter().map(encode_tool).collect();
        state
            .messages
            .push(json!({"role": "user", "content": content}));
        self.complete(&mut state).await
    }

    async fn send_tool_results(
        &self,
        results: &[ToolResultMessage],
    ) -> Result<LlmResponse, GatewayError> {
        let mut state = self.state.lock().await;
        for result in results {
            state.messages.push(json!({
                "role": "tool",
                "tool_call_id": result.tool_use_id,
                "content": result.output,
            }));
        }
        self.complete(&mut state).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else if err.is_connect() {
        GatewayError::ConnectionError(err.to_string())
    } else {
        GatewayError::RequestFailed(err.to_string())
    }
}

/// `{name, description, parameters}` as an OpenAI function tool
pub fn encode_tool(surface: &ToolSurface) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": surface.name,
            "description": surface.description,
            "parameters": surface.parameters,
        }
    })
}

fn map_finish_reason(reason: &str) -> StopReason {
    match reason {
        "stop" => StopReason::EndTurn,
        "tool_calls" | "function_call" => StopReason::ToolUse,
        "length" => StopReason::MaxTokens,
        other => StopReason::Other(other.to_string()),
    }
}

/// Split a completion payload into the assistant message to keep in history
/// and the parsed response.
pub fn parse_completion(payload: &Value) -> Result<(Value, LlmResponse), GatewayError> {
    let choice = payload["choices"]
        .get(0)
        .ok_or_else(|| GatewayError::InvalidResponse("No choices in response".to_string()))?;
    let message = &choice["message"];
    if !message.is_object() {
        return Err(GatewayError::InvalidResponse(
            "Choice has no message".to_string(),
        ));
    }

    let mut content = Vec::new();
    if let Some(text) = message["content"].as_str()
        && !text.is_empty()
    {
        content.push(ContentBlock::Text(text.to_string()));
    }

    if let Some(calls) = message["tool_calls"].as_array() {
        for (index, call) in calls.iter().enumerate() {
            let Some(name) = call["function"]["name"].as_str() else {
                continue;
            };
            let id = call["id"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| format!("call_{}", index));
            let input = match &call["function"]["arguments"] {
                Value::String(raw) if raw.trim().is_empty() => json!({}),
                Value::String(raw) => {
                    serde_json::from_str(raw).unwrap_or_else(|_| json!({ "_raw": raw }))
                }
                Value::Null => json!({}),
                other => other.clone(),
            };
            content.push(ContentBlock::ToolUse {
                id,
                name: name.to_string(),
                input,
            });
        }
    }

    let usage = TokenUsage::new(
        payload["usage"]["prompt_tokens"].as_u64().unwrap_or(0),
        payload["usage"]["completion_tokens"].as_u64().unwrap_or(0),
    );

    let response = LlmResponse {
        content,
        stop_reason: choice["finish_reason"].as_str().map(map_finish_reason),
        model: payload["model"].as_str().map(str::to_string),
        usage,
    };
    Ok((message.clone(), response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_completion() {
        let payload = json!({
            "model": "gpt-4o-mini",
            "choices": [{
                "message": {"role": "assistant", "content": "All done"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 120, "completion_tokens": 8}
        });

        let (assistant, response) = parse_completion(&payload).unwrap();
        assert_eq!(assistant["role"], "assistant");
        assert_eq!(response.text_content(), "All done");
        assert_eq!(response.stop_reason, Some(StopReason::EndTurn));
        assert_eq!(response.usage, TokenUsage::new(120, 8));
        assert_eq!(response.model.as_deref(), Some("gpt-4o-mini"));
    }

    #[test]
    fn test_parse_tool_calls() {
        let payload = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [
                        {"id": "call_a", "type": "function",
                         "function": {"name": "read_file", "arguments": "{\"path\":\"src/lib.rs\"}"}},
                        {"id": "call_b", "type": "function",
                         "function": {"name": "run_command", "arguments": "{not json"}}
                    ]
                },
                "finish_reason": "tool_calls"
            }]
        });

        let (_, response) = parse_completion(&payload).unwrap();
        let calls = response.tool_calls();

        assert_eq!(response.stop_reason, Some(StopReason::ToolUse));
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].tool_name, "read_file");
        assert_eq!(calls[0].arguments, json!({"path": "src/lib.rs"}));
        assert_eq!(calls[0].call_id.as_deref(), Some("call_a"));
        assert_eq!(calls[1].arguments, json!({"_raw": "{not json"}));
        assert_eq!(response.usage, TokenUsage::default());
    }

    #[test]
    fn test_parse_rejects_empty_choices() {
        let err = parse_completion(&json!({"choices": []})).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }

    #[test]
    fn test_finish_reason_mapping() {
        assert_eq!(map_finish_reason("length"), StopReason::MaxTokens);
        assert_eq!(
            map_finish_reason("content_filter"),
            StopReason::Other("content_filter".to_string())
        );
    }

    #[test]
    fn test_encode_tool() {
        let surface = ToolSurface {
            name: "read_file".to_string(),
            description: "Read a file".to_string(),
            parameters: json!({"type": "object", "properties": {}}),
        };
        let encoded = encode_tool(&surface);
        assert_eq!(encoded["type"], "function");
        assert_eq!(encoded["function"]["name"], "read_file");
        assert_eq!(encoded["function"]["parameters"]["type"], "object");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_connection_error() {
        // Port 9 (discard) on localhost is closed on any sane test host.
        let gateway = OpenAiCompatibleGateway::new("http://127.0.0.1:9/v1/", None, "m");
        assert_eq!(gateway.base_url(), "http://127.0.0.1:9/v1");

        let session = gateway.create_session("system").await.unwrap();
        let err = session.send_with_tools("hi", &[]).await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::ConnectionError(_) | GatewayError::RequestFailed(_)
        ));
    }
}
