// src/hn/fetch.rs
use std::sync::Arc;

use crate::hn::client::ContentSource;
use crate::hn::types::Item;

/// Fetch details for every id concurrently (one task per id).
///
/// Failed fetches and title-less items are dropped. Survivors keep the order of
/// `ids`, whatever order the tasks finish in.
pub async fn fetch_details(source: &Arc<dyn ContentSource>, ids: &[u64]) -> Vec<Item> {
    let handles: Vec<_> = ids
        .iter()
        .map(|&id| {
            let src = Arc::clone(source);
            tokio::spawn(async move { src.fetch_item(id).await })
        })
        .collect();

    let mut out = Vec::with_capacity(handles.len());
    for (id, handle) in ids.iter().zip(handles) {
        match handle.await {
            Ok(Some(item)) if item.has_title() => out.push(item),
            Ok(_) => {}
            Err(e) => tracing::warn!(error = ?e, id, "item task did not complete"),
        }
    }
    out
}
