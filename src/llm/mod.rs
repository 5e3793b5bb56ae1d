//! LLM bridge: streaming client, tool registry, and the agentic chat loop

pub mod client;
pub mod prompt;
pub mod tools;

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::chain::ChainRegistry;
use crate::config::LlmConfig;
use crate::{Error, Result};

pub use client::{ChatMessage, FunctionCall, LlmClient, StepOutcome, ToolCall, ToolSpec};
pub use prompt::SYSTEM_PROMPT;
pub use tools::{dispatch, tool_specs, ToolContext};

/// Event emitted while a chat request is being answered
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ChatEvent {
    /// Incremental assistant text
    Text {
        /// Text fragment
        delta: String,
    },
    /// The model requested a tool execution
    ToolCall {
        /// Tool name
        name: String,
        /// JSON-encoded arguments
        arguments: String,
    },
    /// A tool finished and its envelope was fed back to the model
    ToolResult {
        /// Tool name
        name: String,
        /// Whether the envelope reported success
        success: bool,
    },
    /// The conversation step loop finished
    Done,
}

/// Drives multi-step tool-calling conversations against the provider
pub struct ChatEngine {
    client: LlmClient,
    context: ToolContext,
    max_steps: u32,
}

impl ChatEngine {
    /// Build an engine sharing the gateway's HTTP client and registry.
    #[must_use]
    pub fn new(http: reqwest::Client, config: &LlmConfig, registry: Arc<ChainRegistry>) -> Self {
        Self {
            client: LlmClient::new(http, config),
            context: ToolContext { registry },
            max_steps: config.max_steps,
        }
    }

    /// Run the conversation to completion, emitting [`ChatEvent`]s on
    /// `events` as the model streams text and calls tools.
    ///
    /// The system prompt is prepended; the model may interleave up to
    /// `max_steps` tool rounds before producing a final answer.
    ///
    /// # Errors
    ///
    /// Returns an error when the provider rejects a request or the step
    /// budget is exhausted without a final answer.
    pub async fn run(
        &self,
        history: Vec<ChatMessage>,
        events: &mpsc::Sender<ChatEvent>,
    ) -> Result<()> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(SYSTEM_PROMPT));
        messages.extend(history);

        let tools = tool_specs();

        for step in 0..self.max_steps {
            debug!(step, "starting completion step");
            let outcome = self.stream_one(&messages, &tools, events).await?;

            if outcome.tool_calls.is_empty() {
                if outcome.finish_reason.as_deref() != Some("stop") {
                    debug!(
                        finish_reason = ?outcome.finish_reason,
                        "step ended without tool calls, treating as final"
                    );
                }
                let _ = events.send(ChatEvent::Done).await;
                return Ok(());
            }

            messages.push(ChatMessage::assistant_tool_calls(
                outcome.tool_calls.clone(),
            ));

            for call in outcome.tool_calls {
                info!(tool = call.function.name, "model requested tool");
                let _ = events
                    .send(ChatEvent::ToolCall {
                        name: call.function.name.clone(),
                        arguments: call.function.arguments.clone(),
                    })
                    .await;

                let envelope =
                    tools::dispatch(&call.function.name, &call.function.arguments, &self.context)
                        .await;
                let success = envelope["success"] == json!(true);
                let _ = events
                    .send(ChatEvent::ToolResult {
                        name: call.function.name.clone(),
                        success,
                    })
                    .await;

                messages.push(ChatMessage::tool_result(call.id, envelope.to_string()));
            }
        }

        Err(Error::Llm(format!(
            "no final answer after {} tool steps",
            self.max_steps
        )))
    }

    async fn stream_one(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
        events: &mpsc::Sender<ChatEvent>,
    ) -> Result<StepOutcome> {
        let (delta_tx, mut delta_rx) = mpsc::channel::<String>(64);

        let sink = events.clone();
        let forwarder = tokio::spawn(async move {
            while let Some(delta) = delta_rx.recv().await {
                let _ = sink.send(ChatEvent::Text { delta }).await;
            }
        });

        let outcome = self.client.stream_step(messages, tools, &delta_tx).await;
        drop(delta_tx);
        let _ = forwarder.await;
        outcome
    }
}
