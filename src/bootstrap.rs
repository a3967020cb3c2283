// src/bootstrap.rs
use crate::api::{self, AppState};
use crate::config::AgentConfig;
use crate::hn::HackerNewsClient;
use crate::llm::build_client_from_config;
use crate::pipeline::QueryPipeline;
use axum::Router;
use std::sync::Arc;
use tracing::info;

/// Wire the real Hacker News client and LLM provider into a pipeline.
pub fn build_pipeline(cfg: &AgentConfig) -> anyhow::Result<QueryPipeline> {
    let source = Arc::new(HackerNewsClient::new(&cfg.hn)?);
    let llm = build_client_from_config(&cfg.llm)?;
    // Safe diagnostics: only provider + model + key length
    info!(
        "agent wired: hn={}, llm={}, model={}, enabled={}, key_len={}",
        cfg.hn.base_url,
        llm.provider_name(),
        cfg.llm.model,
        cfg.llm.enabled,
        cfg.llm.api_key.len()
    );
    // One client serves both roles; the system prompts differ per call.
    Ok(QueryPipeline::new(source, llm.clone(), llm))
}

/// Full HTTP app without the metrics route.
pub fn app(cfg: &AgentConfig) -> anyhow::Result<Router> {
    let pipeline = build_pipeline(cfg)?;
    Ok(api::router(AppState::new(pipeline)))
}
