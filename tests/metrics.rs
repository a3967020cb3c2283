// tests/metrics.rs
//
// Prometheus exposition after one pipeline run. Installs the global recorder,
// so it lives in its own test binary with a single test.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
};
use tower::ServiceExt as _; // for `oneshot`

use hn_agent::hn::{Category, ContentSource, Item};
use hn_agent::llm::DisabledClient;
use hn_agent::metrics::Metrics;
use hn_agent::QueryPipeline;

struct EmptySource;

#[async_trait]
impl ContentSource for EmptySource {
    async fn fetch_item(&self, _id: u64) -> Option<Item> {
        None
    }
    async fn fetch_listing(&self, _category: Category, _limit: usize) -> Vec<u64> {
        Vec::new()
    }
    fn name(&self) -> &'static str {
        "empty"
    }
}

#[tokio::test]
async fn metrics_route_exposes_pipeline_counters() {
    let metrics = Metrics::init().expect("install recorder");

    let llm = Arc::new(DisabledClient);
    let pipeline = QueryPipeline::new(Arc::new(EmptySource), llm.clone(), llm);
    let out = pipeline.run_structured("top stories").await;
    assert_eq!(out.stories_count(), 0);

    let req = Request::builder()
        .method("GET")
        .uri("/metrics")
        .body(Body::empty())
        .expect("build GET /metrics");
    let resp = metrics.router().oneshot(req).await.expect("oneshot /metrics");
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    let text = String::from_utf8(bytes.to_vec()).expect("utf8");
    assert!(text.contains("queries_total"), "body: {text}");
    assert!(text.contains(r#"mode="structured""#), "body: {text}");
    assert!(text.contains("interpreter_fallback_total"), "body: {text}");
}
