// src/hn/client.rs
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use metrics::counter;

use crate::config::HnConfig;
use crate::hn::types::{Category, Item};

/// Read-only access to the content source.
/// Implementations must never fail: errors are absorbed into `None` / empty.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_item(&self, id: u64) -> Option<Item>;
    async fn fetch_listing(&self, category: Category, limit: usize) -> Vec<u64>;
    fn name(&self) -> &'static str;
}

/// Hacker News Firebase API client.
pub struct HackerNewsClient {
    http: reqwest::Client,
    base_url: String,
}

impl HackerNewsClient {
    pub fn new(cfg: &HnConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("hn-agent/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("building hacker news http client")?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_item(&self, id: u64) -> Result<Option<Item>> {
        let url = format!("{}/item/{id}.json", self.base_url);
        let resp = self.http.get(&url).send().await.context("item get()")?;
        if !resp.status().is_success() {
            bail!("item {id}: upstream status {}", resp.status());
        }
        // Deleted / unknown ids come back as a literal `null`.
        let item: Option<Item> = resp.json().await.context("item json")?;
        Ok(item)
    }

    async fn get_listing(&self, category: Category) -> Result<Vec<u64>> {
        let url = format!("{}/{}", self.base_url, category.listing_path());
        let resp = self.http.get(&url).send().await.context("listing get()")?;
        if !resp.status().is_success() {
            bail!("{} listing: upstream status {}", category.as_str(), resp.status());
        }
        let ids: Option<Vec<u64>> = resp.json().await.context("listing json")?;
        Ok(ids.unwrap_or_default())
    }
}

#[async_trait]
impl ContentSource for HackerNewsClient {
    async fn fetch_item(&self, id: u64) -> Option<Item> {
        match self.get_item(id).await {
            Ok(item) => item,
            Err(e) => {
                tracing::warn!(error = ?e, id, "item fetch failed");
                counter!("hn_item_fetch_errors_total").increment(1);
                None
            }
        }
    }

    async fn fetch_listing(&self, category: Category, limit: usize) -> Vec<u64> {
        match self.get_listing(category).await {
            Ok(mut ids) => {
                ids.truncate(limit);
                ids
            }
            Err(e) => {
                tracing::warn!(
                    error = ?e,
                    category = category.as_str(),
                    "listing fetch failed"
                );
                counter!("hn_listing_fetch_errors_total").increment(1);
                Vec::new()
            }
        }
    }

    fn name(&self) -> &'static str {
        "hackernews"
    }
}
