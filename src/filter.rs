// src/filter.rs
use crate::hn::Item;

/// Keep items whose title, text or url contains `topic` (case-insensitive).
/// A missing or blank topic returns the items unchanged. Order is preserved.
pub fn filter_by_topic(items: Vec<Item>, topic: Option<&str>) -> Vec<Item> {
    let needle = match topic.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_lowercase(),
        _ => return items,
    };

    items
        .into_iter()
        .filter(|it| {
            [it.title.as_deref(), it.text.as_deref(), it.url.as_deref()]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}
