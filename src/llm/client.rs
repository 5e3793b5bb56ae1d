//! OpenAI-compatible streaming chat-completions client
//!
//! Speaks the `/chat/completions` wire format with `stream: true` and
//! parses the SSE chunk stream, accumulating tool-call argument deltas
//! until the model finishes the step.

use std::collections::BTreeMap;

use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::LlmConfig;
use crate::{Error, Result};

/// One message in the completion transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "system", "user", "assistant" or "tool"
    pub role: String,
    /// Message text; absent for pure tool-call assistant turns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Tool calls issued by an assistant turn
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// Id of the tool call a "tool" message answers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    /// A system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// A user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// An assistant turn carrying tool calls.
    #[must_use]
    pub fn assistant_tool_calls(calls: Vec<ToolCall>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: None,
            tool_calls: Some(calls),
            tool_call_id: None,
        }
    }

    /// A tool-result message answering one tool call.
    #[must_use]
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }
}

/// A completed tool call with fully accumulated arguments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned call id
    pub id: String,
    /// Always "function"
    #[serde(rename = "type")]
    pub call_type: String,
    /// Function name and serialized arguments
    pub function: FunctionCall,
}

/// Function payload of a tool call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Tool name
    pub name: String,
    /// JSON-encoded argument object
    pub arguments: String,
}

/// Tool declaration in the request body
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    /// Always "function"
    #[serde(rename = "type")]
    pub spec_type: String,
    /// Name, description and JSON-schema parameters
    pub function: Value,
}

/// Outcome of one streamed completion step
#[derive(Debug)]
pub struct StepOutcome {
    /// Full assistant text of the step
    pub text: String,
    /// Tool calls the model wants executed, empty on a final answer
    pub tool_calls: Vec<ToolCall>,
    /// Provider finish reason, e.g. "stop" or "tool_calls"
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCallDelta>>,
}

#[derive(Debug, Deserialize)]
struct ToolCallDelta {
    index: usize,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    function: Option<FunctionDelta>,
}

#[derive(Debug, Default, Deserialize)]
struct FunctionDelta {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    arguments: Option<String>,
}

#[derive(Debug, Default)]
struct PartialToolCall {
    id: String,
    name: String,
    arguments: String,
}

/// Streaming client bound to one provider endpoint
pub struct LlmClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    temperature: f64,
}

impl LlmClient {
    /// Build a client from the LLM configuration.
    #[must_use]
    pub fn new(http: Client, config: &LlmConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.resolve_api_key().filter(|k| !k.is_empty()),
            temperature: config.temperature,
        }
    }

    /// Run one streamed completion step. Text deltas are forwarded on
    /// `deltas` as they arrive; the accumulated text and tool calls are
    /// returned when the stream ends.
    pub async fn stream_step(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
        deltas: &mpsc::Sender<String>,
    ) -> Result<StepOutcome> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "tools": tools,
            "temperature": self.temperature,
            "stream": true,
        });

        let mut request = self.http.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Llm(format!("provider returned {status}: {detail}")));
        }

        let mut stream = response.bytes_stream();
        let mut buffer = String::new();
        let mut text = String::new();
        let mut partial_calls: BTreeMap<usize, PartialToolCall> = BTreeMap::new();
        let mut finish_reason = None;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            buffer.push_str(&String::from_utf8_lossy(&chunk));

            while let Some(pos) = buffer.find('\n') {
                let line = buffer[..pos].trim().to_string();
                buffer.drain(..=pos);

                let Some(payload) = line.strip_prefix("data: ") else {
                    continue;
                };
                if payload == "[DONE]" {
                    buffer.clear();
                    break;
                }

                let parsed: StreamChunk = match serde_json::from_str(payload) {
                    Ok(parsed) => parsed,
                    Err(err) => {
                        debug!(error = %err, "skipping unparseable stream chunk");
                        continue;
                    }
                };

                for choice in parsed.choices {
                    if let Some(content) = choice.delta.content {
                        text.push_str(&content);
                        if deltas.send(content).await.is_err() {
                            warn!("delta receiver dropped, continuing to drain stream");
                        }
                    }
                    if let Some(calls) = choice.delta.tool_calls {
                        for delta in calls {
                            let partial = partial_calls.entry(delta.index).or_default();
                            if let Some(id) = delta.id {
                                partial.id = id;
                            }
                            if let Some(function) = delta.function {
                                if let Some(name) = function.name {
                                    partial.name = name;
                                }
                                if let Some(arguments) = function.arguments {
                                    partial.arguments.push_str(&arguments);
                                }
                            }
                        }
                    }
                    if let Some(reason) = choice.finish_reason {
                        finish_reason = Some(reason);
                    }
                }
            }
        }

        let tool_calls = partial_calls
            .into_values()
            .filter(|p| !p.name.is_empty())
            .map(|p| ToolCall {
                id: p.id,
                call_type: "function".to_string(),
                function: FunctionCall {
                    name: p.name,
                    arguments: if p.arguments.is_empty() {
                        "{}".to_string()
                    } else {
                        p.arguments
                    },
                },
            })
            .collect();

        Ok(StepOutcome {
            text,
            tool_calls,
            finish_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn chunk_parsing_handles_text_delta() {
        let raw = r#"{"choices":[{"delta":{"content":"Hello"},"finish_reason":null}]}"#;
        let chunk: StreamChunk = serde_json::from_str(raw).unwrap();
        assert_eq!(chunk.choices[0].delta.content.as_deref(), Some("Hello"));
        assert!(chunk.choices[0].finish_reason.is_none());
    }

    #[test]
    fn chunk_parsing_handles_tool_call_delta() {
        let raw = r#"{"choices":[{"delta":{"tool_calls":[{"index":0,"id":"call_1","function":{"name":"get_flare_network_info","arguments":"{\"chain"}}]},"finish_reason":null}]}"#;
        let chunk: StreamChunk = serde_json::from_str(raw).unwrap();
        let calls = chunk.choices[0].delta.tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].index, 0);
        assert_eq!(calls[0].id.as_deref(), Some("call_1"));
        assert_eq!(
            calls[0].function.as_ref().unwrap().name.as_deref(),
            Some("get_flare_network_info")
        );
    }

    #[test]
    fn message_constructors_set_roles() {
        assert_eq!(ChatMessage::system("s").role, "system");
        assert_eq!(ChatMessage::user("u").role, "user");
        let tool = ChatMessage::tool_result("call_1", "{}");
        assert_eq!(tool.role, "tool");
        assert_eq!(tool.tool_call_id.as_deref(), Some("call_1"));
    }

    #[test]
    fn tool_result_serializes_without_null_fields() {
        let json = serde_json::to_value(ChatMessage::user("hi")).unwrap();
        assert!(json.get("tool_calls").is_none());
        assert!(json.get("tool_call_id").is_none());
    }
}
