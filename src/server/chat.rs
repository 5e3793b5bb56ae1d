//! POST /api/chat - SSE chat handler

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use async_stream::stream;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    response::{IntoResponse, Response},
};
use futures::Stream;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{error, info};

use super::router::AppState;
use crate::llm::{ChatEvent, ChatMessage};

/// Incoming chat request body
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Conversation so far, oldest first
    pub messages: Vec<IncomingMessage>,
}

/// One conversation message from the client
#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    /// "user", "assistant" or "system"
    pub role: String,
    /// Message text
    pub content: String,
}

/// POST /api/chat handler - runs the tool loop and streams events as SSE
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Response {
    if request.messages.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "messages must not be empty" })),
        )
            .into_response();
    }

    info!(messages = request.messages.len(), "chat request");

    let history: Vec<ChatMessage> = request
        .messages
        .into_iter()
        .map(|m| match m.role.as_str() {
            "system" => ChatMessage::system(m.content),
            "assistant" => ChatMessage {
                role: "assistant".to_string(),
                content: Some(m.content),
                tool_calls: None,
                tool_call_id: None,
            },
            _ => ChatMessage::user(m.content),
        })
        .collect();

    let (event_tx, event_rx) = mpsc::channel::<ChatEvent>(64);
    let engine = Arc::clone(&state.engine);

    let run = tokio::spawn(async move {
        let result = engine.run(history, &event_tx).await;
        if let Err(ref err) = result {
            error!(error = %err, "chat run failed");
            let _ = event_tx
                .send(ChatEvent::Text {
                    delta: format!("\n\nAnalysis failed: {err}"),
                })
                .await;
            let _ = event_tx.send(ChatEvent::Done).await;
        }
    });

    Sse::new(event_stream(event_rx, run))
        .keep_alive(
            KeepAlive::new()
                .interval(Duration::from_secs(15))
                .text("ping"),
        )
        .into_response()
}

fn event_stream(
    mut event_rx: mpsc::Receiver<ChatEvent>,
    run: tokio::task::JoinHandle<()>,
) -> impl Stream<Item = std::result::Result<Event, Infallible>> {
    stream! {
        while let Some(event) = event_rx.recv().await {
            let done = matches!(event, ChatEvent::Done);
            let name = match &event {
                ChatEvent::Text { .. } => "text",
                ChatEvent::ToolCall { .. } => "tool-call",
                ChatEvent::ToolResult { .. } => "tool-result",
                ChatEvent::Done => "done",
            };
            yield Ok(Event::default()
                .event(name)
                .data(serde_json::to_string(&event).unwrap_or_default()));
            if done {
                break;
            }
        }
        let _ = run.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn event_stream_forwards_until_done() {
        let (tx, rx) = mpsc::channel(8);
        let run = tokio::spawn(async {});

        tx.send(ChatEvent::Text {
            delta: "hi".to_string(),
        })
        .await
        .unwrap();
        tx.send(ChatEvent::Done).await.unwrap();

        let events: Vec<_> = event_stream(rx, run).collect().await;
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn incoming_messages_deserialize() {
        let request: ChatRequest = serde_json::from_str(
            r#"{"messages":[{"role":"user","content":"analyze 0xabc on chain 14"}]}"#,
        )
        .unwrap();
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, "user");
    }
}
