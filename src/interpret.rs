// src/interpret.rs
//! Query interpreter: free text -> [`RetrievalPlan`] via the LLM capability.
//!
//! The model is asked for a bare JSON object but nothing guarantees it. The raw
//! output goes through a heuristic extractor (first `{` .. last `}`), and any
//! failure on the way falls back to [`RetrievalPlan::default`].

use metrics::counter;
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::hn::Category;
use crate::llm::DynLlmClient;

pub const DEFAULT_COUNT: u32 = 5;

pub const INTERPRETER_SYSTEM_PROMPT: &str = r#"You are a HackerNews AI assistant. Your job is to analyze user queries and extract:
1. Intent: 'search' (find specific topics), 'summarize' (summarize headlines), or 'latest' (get latest news)
2. Topic: The main topic/keyword to search for (if applicable)
3. Count: Number of stories requested (default 5 if not specified)
4. Story type: 'top', 'new', or 'best' (default 'top')

Respond ONLY with a JSON object in this exact format:
{"intent": "search|summarize|latest", "topic": "topic name or null", "count": number, "story_type": "top|new|best"}

Examples:
- "find latest 3 news about AI" -> {"intent": "search", "topic": "AI", "count": 3, "story_type": "new"}
- "summarize biggest headlines today" -> {"intent": "summarize", "topic": null, "count": 10, "story_type": "top"}
- "what's new about python" -> {"intent": "search", "topic": "python", "count": 5, "story_type": "new"}
- "top stories" -> {"intent": "latest", "topic": null, "count": 5, "story_type": "top"}"#;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Search,
    Summarize,
    #[default]
    Latest,
}

impl Intent {
    fn from_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "search" => Intent::Search,
            "summarize" | "summarise" => Intent::Summarize,
            _ => Intent::Latest,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Search => "search",
            Intent::Summarize => "summarize",
            Intent::Latest => "latest",
        }
    }
}

/// Structured parameters derived from one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalPlan {
    pub intent: Intent,
    pub topic: Option<String>,
    pub count: u32, // always >= 1
    pub category: Category,
}

impl Default for RetrievalPlan {
    fn default() -> Self {
        Self {
            intent: Intent::Latest,
            topic: None,
            count: DEFAULT_COUNT,
            category: Category::Top,
        }
    }
}

/// Loose shape of the model's JSON; every field may be missing or mistyped.
#[derive(Debug, Default, Deserialize)]
struct RawPlan {
    #[serde(default)]
    intent: Option<Value>,
    #[serde(default)]
    topic: Option<Value>,
    #[serde(default)]
    count: Option<Value>,
    #[serde(default)]
    story_type: Option<Value>,
}

impl RawPlan {
    fn into_plan(self) -> RetrievalPlan {
        let intent = self
            .intent
            .as_ref()
            .and_then(Value::as_str)
            .map(Intent::from_loose)
            .unwrap_or_default();

        let topic = self
            .topic
            .as_ref()
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case("null"))
            .map(str::to_string);

        let count = self.count.as_ref().and_then(coerce_count).unwrap_or(DEFAULT_COUNT);

        let category = self
            .story_type
            .as_ref()
            .and_then(Value::as_str)
            .map(Category::from_loose)
            .unwrap_or_default();

        RetrievalPlan {
            intent,
            topic,
            count,
            category,
        }
    }
}

/// Positive integer (or integer-valued float / numeric string), else `None`.
fn coerce_count(v: &Value) -> Option<u32> {
    let n = match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    if n >= 1 {
        u32::try_from(n).ok()
    } else {
        None
    }
}

/// Greedy extraction: the substring from the first `{` to the last `}`.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    static RE_OBJ: OnceCell<Regex> = OnceCell::new();
    let re = RE_OBJ.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("json object regex"));
    re.find(raw).map(|m| m.as_str())
}

/// Turn raw model output into a plan; `None` when no usable object is present.
pub fn plan_from_output(raw: &str) -> Option<RetrievalPlan> {
    let obj = extract_json_object(raw)?;
    let parsed: RawPlan = serde_json::from_str(obj).ok()?;
    Some(parsed.into_plan())
}

pub struct QueryInterpreter {
    llm: DynLlmClient,
}

impl QueryInterpreter {
    pub fn new(llm: DynLlmClient) -> Self {
        Self { llm }
    }

    /// Never fails: any problem yields the default plan.
    pub async fn parse(&self, query: &str) -> RetrievalPlan {
        let raw = match self.llm.complete(INTERPRETER_SYSTEM_PROMPT, query).await {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(
                    error = ?e,
                    provider = self.llm.provider_name(),
                    "interpreter call failed"
                );
                counter!("interpreter_fallback_total").increment(1);
                return RetrievalPlan::default();
            }
        };

        match plan_from_output(&raw) {
            Some(plan) => plan,
            None => {
                tracing::warn!(output_len = raw.len(), "interpreter output had no usable plan");
                counter!("interpreter_fallback_total").increment(1);
                RetrievalPlan::default()
            }
        }
    }
}
