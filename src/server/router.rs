//! HTTP router and handlers

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tower_http::{
    catch_panic::CatchPanicLayer, compression::CompressionLayer, cors::CorsLayer,
    limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

use super::chat::chat_handler;
use crate::chain::ChainRegistry;
use crate::config::ServerConfig;
use crate::llm::ChatEngine;

/// Shared application state
pub struct AppState {
    /// Chain registry
    pub registry: Arc<ChainRegistry>,
    /// Chat engine driving the LLM tool loop
    pub engine: Arc<ChatEngine>,
}

/// Create the router
pub fn create_router(state: Arc<AppState>, server: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("authorization"),
            HeaderName::from_static("x-api-key"),
        ])
        .max_age(Duration::from_secs(86400));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/chat", post(chat_handler))
        .layer(cors)
        .layer(CatchPanicLayer::custom(panic_handler))
        .layer(CompressionLayer::new())
        // The timeout bounds producing the response head; an accepted SSE
        // stream keeps running past it.
        .layer(TimeoutLayer::new(server.request_timeout))
        .layer(RequestBodyLimitLayer::new(server.max_body_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "chains": state.registry.all().len(),
    }))
}

/// Turn a handler panic into the standard 500 body.
fn panic_handler(err: Box<dyn std::any::Any + Send + 'static>) -> axum::response::Response {
    let details = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("panic");

    let mut response = Json(json!({
        "error": "Internal Server Error",
        "details": details,
    }))
    .into_response();
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}
