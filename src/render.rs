// src/render.rs
//! Response rendering: structured JSON data or an LLM-written narrative.

use chrono::DateTime;
use metrics::counter;
use serde::Serialize;

use crate::hn::Item;
use crate::interpret::{Intent, RetrievalPlan};
use crate::llm::DynLlmClient;

pub const SUMMARY_ITEM_LIMIT: usize = 10;

pub const SUMMARY_FALLBACK: &str = "Error generating summary.";
pub const SUMMARY_EMPTY: &str = "No stories found matching your query.";
pub const NARRATIVE_FALLBACK: &str =
    "I found some stories but had trouble generating a response. Please try again.";
pub const NOT_FOUND_GENERIC: &str =
    "I couldn't find any stories matching your request. Please try a different query.";

pub const NARRATOR_SYSTEM_PROMPT: &str = "You are a helpful HackerNews assistant that responds in natural, conversational language.
Your role is to help users discover and understand HackerNews stories.

When given stories, you should:
1. Provide a clear, conversational response
2. Highlight the most interesting or relevant stories
3. Include key details like scores, comments, and themes
4. Use a friendly, informative tone
5. Format responses clearly with proper structure

For search queries: Present the stories you found and briefly describe them.
For summarization: Provide an overview of key themes and highlights.
For general queries: Give a helpful, informative response about what you found.

Always be concise but informative. Use natural language, not JSON or technical jargon.";

/// Trimmed projection of an [`Item`] for the search/latest response.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StoryView {
    pub id: u64,
    pub title: String,
    pub url: String,
    pub score: i64,
    pub by: String,
    /// `null` when upstream has no timestamp.
    pub time: Option<i64>,
    pub comments: i64,
}

impl From<&Item> for StoryView {
    fn from(it: &Item) -> Self {
        Self {
            id: it.id,
            title: it.title.clone().unwrap_or_default(),
            url: it.url_or_permalink(),
            score: it.score,
            by: it.author.clone(),
            time: it.posted_at,
            comments: it.comment_count,
        }
    }
}

/// Output of the structured query path.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum RenderedResponse {
    Summary {
        query: String,
        intent: Intent,
        summary: String,
        stories_count: usize,
        stories: Vec<Item>,
    },
    Stories {
        query: String,
        intent: Intent,
        topic: Option<String>,
        stories_count: usize,
        stories: Vec<StoryView>,
    },
}

impl RenderedResponse {
    pub fn stories_count(&self) -> usize {
        match self {
            RenderedResponse::Summary { stories_count, .. }
            | RenderedResponse::Stories { stories_count, .. } => *stories_count,
        }
    }
}

fn format_posted(ts: Option<i64>) -> String {
    ts.and_then(|t| DateTime::from_timestamp(t, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub fn summary_prompt(items: &[Item], query: &str) -> String {
    let stories_text = items
        .iter()
        .take(SUMMARY_ITEM_LIMIT)
        .map(|it| {
            format!(
                "Title: {}\nScore: {} points\nComments: {}\nURL: {}",
                it.title_or_na(),
                it.score,
                it.comment_count,
                it.url.as_deref().unwrap_or("N/A")
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "User query: {query}\n\nHere are the HackerNews stories:\n\n{stories_text}\n\nProvide a concise summary addressing the user's query."
    )
}

pub fn narrative_prompt(items: &[Item], query: &str, topic: Option<&str>) -> String {
    let stories_text = items
        .iter()
        .enumerate()
        .map(|(i, it)| {
            format!(
                "Story {}:\nTitle: {}\nURL: {}\nScore: {} points\nAuthor: {}\nComments: {}\nPosted: {}",
                i + 1,
                it.title_or_na(),
                it.url_or_permalink(),
                it.score,
                it.author,
                it.comment_count,
                format_posted(it.posted_at)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut context = format!("User asked: '{query}'\n");
    if let Some(t) = topic {
        context.push_str(&format!("They are looking for stories about: {t}\n"));
    }
    context.push_str(&format!("Found {} relevant stories.\n\n", items.len()));

    format!(
        "{context}Stories from HackerNews:\n\n{stories_text}\n\n\
Please provide a natural, conversational response to the user's query.\n\
- Be helpful and informative\n\
- Highlight the most interesting stories\n\
- Include relevant details (scores, comment counts)\n\
- Keep it concise but engaging\n\
- Use a friendly tone"
    )
}

pub fn not_found_message(topic: Option<&str>) -> String {
    match topic {
        Some(t) => format!(
            "I couldn't find any HackerNews stories about '{t}' at the moment. You might want to try a different search term or check back later."
        ),
        None => NOT_FOUND_GENERIC.to_string(),
    }
}

/// Both renderers share the narrator capability and absorb its failures.
pub struct ResponseRenderer {
    narrator: DynLlmClient,
}

impl ResponseRenderer {
    pub fn new(narrator: DynLlmClient) -> Self {
        Self { narrator }
    }

    async fn narrate(&self, prompt: &str, fallback: &str) -> String {
        match self.narrator.complete(NARRATOR_SYSTEM_PROMPT, prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    error = ?e,
                    provider = self.narrator.provider_name(),
                    "narrator call failed"
                );
                counter!("narrator_errors_total").increment(1);
                fallback.to_string()
            }
        }
    }

    /// Data response. Only the summarize intent calls the narrator.
    pub async fn structured(
        &self,
        items: Vec<Item>,
        query: &str,
        plan: &RetrievalPlan,
    ) -> RenderedResponse {
        match plan.intent {
            Intent::Summarize => {
                let summary = if items.is_empty() {
                    SUMMARY_EMPTY.to_string()
                } else {
                    self.narrate(&summary_prompt(&items, query), SUMMARY_FALLBACK)
                        .await
                };
                RenderedResponse::Summary {
                    query: query.to_string(),
                    intent: plan.intent,
                    summary,
                    stories_count: items.len(),
                    stories: items,
                }
            }
            Intent::Search | Intent::Latest => RenderedResponse::Stories {
                query: query.to_string(),
                intent: plan.intent,
                topic: plan.topic.clone(),
                stories_count: items.len(),
                stories: items.iter().map(StoryView::from).collect(),
            },
        }
    }

    /// Natural-language response; never empty.
    pub async fn narrative(&self, items: &[Item], query: &str, plan: &RetrievalPlan) -> String {
        let topic = plan.topic.as_deref();
        if items.is_empty() {
            return not_found_message(topic);
        }
        self.narrate(&narrative_prompt(items, query, topic), NARRATIVE_FALLBACK)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hn::Category;
    use crate::llm::{DisabledClient, MockProvider};
    use std::sync::Arc;

    fn item(id: u64, title: &str, url: Option<&str>) -> Item {
        Item {
            id,
            title: Some(title.to_string()),
            text: None,
            url: url.map(str::to_string),
            score: 10 * id as i64,
            author: "alice".into(),
            posted_at: Some(1_700_000_000),
            comment_count: 3,
        }
    }

    fn plan(intent: Intent, topic: Option<&str>) -> RetrievalPlan {
        RetrievalPlan {
            intent,
            topic: topic.map(str::to_string),
            count: 5,
            category: Category::Top,
        }
    }

    #[test]
    fn summary_prompt_caps_at_ten_items() {
        let items: Vec<Item> = (1..=12).map(|i| item(i, &format!("story-{i}"), None)).collect();
        let p = summary_prompt(&items, "summarize");
        assert!(p.contains("story-10"));
        assert!(!p.contains("story-11"));
        assert!(p.contains("URL: N/A"));
    }

    #[test]
    fn narrative_prompt_uses_permalink_and_time() {
        let items = vec![item(7, "Ask HN: hi", None)];
        let p = narrative_prompt(&items, "ask", Some("hn"));
        assert!(p.contains("URL: https://news.ycombinator.com/item?id=7"));
        assert!(p.contains("Posted: 2023-11-14 22:13"));
        assert!(p.contains("They are looking for stories about: hn"));
        assert!(p.contains("Found 1 relevant stories."));
    }

    #[tokio::test]
    async fn search_projection_needs_no_narrator() {
        let r = ResponseRenderer::new(Arc::new(DisabledClient));
        let out = r
            .structured(vec![item(1, "a", None)], "q", &plan(Intent::Search, Some("a")))
            .await;
        let v = serde_json::to_value(&out).unwrap();
        assert_eq!(v["stories_count"], 1);
        assert_eq!(v["topic"], "a");
        assert_eq!(v["intent"], "search");
        assert_eq!(v["stories"][0]["url"], "https://news.ycombinator.com/item?id=1");
        assert_eq!(v["stories"][0]["by"], "alice");
        assert_eq!(v["stories"][0]["comments"], 3);
        assert_eq!(v["stories"][0]["time"], 1_700_000_000);
    }

    #[tokio::test]
    async fn missing_timestamp_projects_as_null() {
        let mut undated = item(2, "b", None);
        undated.posted_at = None;
        assert!(narrative_prompt(&[undated.clone()], "q", None).contains("Posted: unknown"));

        let r = ResponseRenderer::new(Arc::new(DisabledClient));
        let out = r
            .structured(vec![undated], "q", &plan(Intent::Latest, None))
            .await;
        let v = serde_json::to_value(&out).unwrap();
        assert!(v["stories"][0]["time"].is_null());
        assert!(v["stories"][0].get("time").is_some());
    }

    #[tokio::test]
    async fn summary_falls_back_on_narrator_error() {
        let r = ResponseRenderer::new(Arc::new(DisabledClient));
        let out = r
            .structured(vec![item(1, "a", None)], "q", &plan(Intent::Summarize, None))
            .await;
        match out {
            RenderedResponse::Summary { summary, stories_count, .. } => {
                assert_eq!(summary, SUMMARY_FALLBACK);
                assert_eq!(stories_count, 1);
            }
            other => panic!("expected summary, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn narrative_paths() {
        let ok = ResponseRenderer::new(Arc::new(MockProvider::new("Here you go")));
        assert_eq!(
            ok.narrative(&[item(1, "a", None)], "q", &plan(Intent::Latest, None)).await,
            "Here you go"
        );

        let empty = ok.narrative(&[], "q", &plan(Intent::Search, Some("zig"))).await;
        assert!(empty.contains("'zig'"));
        assert_eq!(
            ok.narrative(&[], "q", &plan(Intent::Latest, None)).await,
            NOT_FOUND_GENERIC
        );

        let broken = ResponseRenderer::new(Arc::new(DisabledClient));
        assert_eq!(
            broken.narrative(&[item(1, "a", None)], "q", &plan(Intent::Latest, None)).await,
            NARRATIVE_FALLBACK
        );
    }
}
