// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod filter;
pub mod hn;
pub mod interpret;
pub mod llm;
pub mod metrics;
pub mod pipeline;
pub mod render;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::bootstrap::{app, build_pipeline};
pub use crate::config::AgentConfig;
pub use crate::interpret::{Intent, RetrievalPlan};
pub use crate::pipeline::QueryPipeline;
pub use crate::render::RenderedResponse;
