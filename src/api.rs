use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::pipeline::QueryPipeline;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<QueryPipeline>,
}

impl AppState {
    pub fn new(pipeline: QueryPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        .route("/agent", get(conversational_agent))
        .route("/api/agent", get(conversational_agent))
        .route("/api/agent/chat", get(chat_agent))
        .route("/api/agent/query", get(query_agent))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
struct ConversationalResp {
    response: String,
    query: String,
}

/// Non-blank query parameter, or a 400 naming the parameter.
fn required_param(params: &HashMap<String, String>, name: &str) -> Result<String, Response> {
    match params.get(name) {
        Some(v) if !v.trim().is_empty() => Ok(v.clone()),
        _ => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": format!("Query parameter '{name}' is required") })),
        )
            .into_response()),
    }
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "HackerNews AI Agent API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/agent": "Main conversational agent - natural language input & output (use query parameter)",
            "/api/agent/chat": "Legacy conversational endpoint (use q parameter)",
            "/api/agent/query": "Structured agent endpoint - returns JSON data",
            "/api/health": "Health check endpoint"
        },
        "recommended": "/agent?query=<your_question>",
        "examples": [
            "/agent?query=find latest 3 news about AI",
            "/agent?query=summarize biggest headlines today",
            "/agent?query=what's new about python",
            "/agent?query=top 10 stories"
        ]
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn conversational_agent(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let query = match required_param(&params, "query") {
        Ok(q) => q,
        Err(resp) => return resp,
    };
    let response = state.pipeline.run_conversational(&query).await;
    Json(ConversationalResp { response, query }).into_response()
}

async fn chat_agent(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let query = match required_param(&params, "q") {
        Ok(q) => q,
        Err(resp) => return resp,
    };
    let response = state.pipeline.run_conversational(&query).await;
    Json(ConversationalResp { response, query }).into_response()
}

async fn query_agent(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let query = match required_param(&params, "q") {
        Ok(q) => q,
        Err(resp) => return resp,
    };
    Json(state.pipeline.run_structured(&query).await).into_response()
}
