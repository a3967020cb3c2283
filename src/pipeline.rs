// src/pipeline.rs
//! Query pipeline: parse -> listing -> details -> topic filter -> truncate -> render.

use std::sync::Arc;

use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;

use crate::filter::filter_by_topic;
use crate::hn::{fetch_details, ContentSource, Item};
use crate::interpret::{QueryInterpreter, RetrievalPlan};
use crate::llm::DynLlmClient;
use crate::render::{RenderedResponse, ResponseRenderer};

/// Upper bound on ids taken from a listing.
pub const LISTING_LIMIT: usize = 100;
/// Upper bound on concurrent detail fetches per query (and on filter candidates).
pub const DETAIL_FETCH_CAP: usize = 50;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("queries_total", "Queries processed, by mode.");
        describe_counter!("hn_item_fetch_errors_total", "Item fetch/parse errors.");
        describe_counter!("hn_listing_fetch_errors_total", "Listing fetch/parse errors.");
        describe_counter!(
            "interpreter_fallback_total",
            "Queries that fell back to the default plan."
        );
        describe_counter!("narrator_errors_total", "Failed narrator calls.");
    });
}

pub struct QueryPipeline {
    source: Arc<dyn ContentSource>,
    interpreter: QueryInterpreter,
    renderer: ResponseRenderer,
}

impl QueryPipeline {
    /// `interpreter` and `narrator` may be the same client.
    pub fn new(
        source: Arc<dyn ContentSource>,
        interpreter: DynLlmClient,
        narrator: DynLlmClient,
    ) -> Self {
        ensure_metrics_described();
        Self {
            source,
            interpreter: QueryInterpreter::new(interpreter),
            renderer: ResponseRenderer::new(narrator),
        }
    }

    /// Steps shared by both modes, up to (not including) rendering.
    async fn retrieve(&self, query: &str, mode: &'static str) -> (RetrievalPlan, Vec<Item>) {
        counter!("queries_total", "mode" => mode).increment(1);

        let plan = self.interpreter.parse(query).await;

        let mut ids = self
            .source
            .fetch_listing(plan.category, LISTING_LIMIT)
            .await;
        ids.truncate(DETAIL_FETCH_CAP);

        let fetched = fetch_details(&self.source, &ids).await;
        let candidates = fetched.len();

        let mut items = filter_by_topic(fetched, plan.topic.as_deref());
        items.truncate(plan.count as usize);

        tracing::info!(
            target: "pipeline",
            mode,
            source = self.source.name(),
            intent = plan.intent.as_str(),
            category = plan.category.as_str(),
            topic = plan.topic.as_deref().unwrap_or(""),
            listed = ids.len(),
            candidates,
            kept = items.len(),
            "query retrieved"
        );

        (plan, items)
    }

    pub async fn run_structured(&self, query: &str) -> RenderedResponse {
        let (plan, items) = self.retrieve(query, "structured").await;
        self.renderer.structured(items, query, &plan).await
    }

    pub async fn run_conversational(&self, query: &str) -> String {
        let (plan, items) = self.retrieve(query, "conversational").await;
        self.renderer.narrative(&items, query, &plan).await
    }
}
