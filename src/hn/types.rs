// src/hn/types.rs
use serde::{Deserialize, Serialize};

pub const ITEM_PERMALINK_BASE: &str = "https://news.ycombinator.com/item?id=";

fn default_author() -> String {
    "unknown".to_string()
}

/// Story snapshot as served by `/item/{id}.json`.
/// Field names on the wire follow the upstream API (`by`, `time`, `descendants`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub score: i64,
    #[serde(rename = "by", default = "default_author")]
    pub author: String,
    #[serde(rename = "time", default, skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<i64>, // unix seconds
    #[serde(rename = "descendants", default)]
    pub comment_count: i64,
}

impl Item {
    /// Items without a (non-blank) title are dropped at fetch time.
    pub fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    pub fn title_or_na(&self) -> &str {
        self.title.as_deref().unwrap_or("N/A")
    }

    /// Outbound link, or the discussion page when the story has none (Ask HN etc).
    pub fn url_or_permalink(&self) -> String {
        match self.url.as_deref() {
            Some(u) if !u.is_empty() => u.to_string(),
            _ => permalink(self.id),
        }
    }
}

pub fn permalink(id: u64) -> String {
    format!("{ITEM_PERMALINK_BASE}{id}")
}

/// Upstream listing partition.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Top,
    New,
    Best,
}

impl Category {
    /// Lenient parse used for model output; anything unknown is `Top`.
    pub fn from_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Category::New,
            "best" => Category::Best,
            _ => Category::Top,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Top => "top",
            Category::New => "new",
            Category::Best => "best",
        }
    }

    /// Path segment of the listing endpoint, e.g. `newstories.json`.
    pub fn listing_path(&self) -> String {
        format!("{}stories.json", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_defaults_are_filled_in() {
        let raw = r#"{"id": 42, "title": "Show HN: thing", "type": "story"}"#;
        let it: Item = serde_json::from_str(raw).unwrap();
        assert_eq!(it.id, 42);
        assert_eq!(it.score, 0);
        assert_eq!(it.author, "unknown");
        assert_eq!(it.comment_count, 0);
        assert_eq!(it.url_or_permalink(), "https://news.ycombinator.com/item?id=42");
    }

    #[test]
    fn upstream_names_map_to_fields() {
        let raw = r#"{"id":1,"title":"t","by":"pg","time":1700000000,"descendants":12,"score":99,"url":"https://x.test"}"#;
        let it: Item = serde_json::from_str(raw).unwrap();
        assert_eq!(it.author, "pg");
        assert_eq!(it.posted_at, Some(1_700_000_000));
        assert_eq!(it.comment_count, 12);
        assert_eq!(it.url_or_permalink(), "https://x.test");
    }

    #[test]
    fn absent_fields_are_omitted_on_the_way_out() {
        let it: Item = serde_json::from_str(r#"{"id":3,"title":"Ask HN: hi"}"#).unwrap();
        assert_eq!(it.posted_at, None);
        let v = serde_json::to_value(&it).unwrap();
        assert!(v.get("text").is_none());
        assert!(v.get("url").is_none());
        assert!(v.get("time").is_none());
        assert_eq!(v["by"], "unknown");
    }

    #[test]
    fn blank_title_is_not_a_title() {
        let it: Item = serde_json::from_str(r#"{"id":1,"title":"   "}"#).unwrap();
        assert!(!it.has_title());
        let it: Item = serde_json::from_str(r#"{"id":2}"#).unwrap();
        assert!(!it.has_title());
    }

    #[test]
    fn category_paths() {
        assert_eq!(Category::New.listing_path(), "newstories.json");
        assert_eq!(Category::from_loose(" BEST "), Category::Best);
        assert_eq!(Category::from_loose("whatever"), Category::Top);
    }
}
