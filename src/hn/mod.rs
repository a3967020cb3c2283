// src/hn/mod.rs
pub mod client;
pub mod fetch;
pub mod types;

pub use client::{ContentSource, HackerNewsClient};
pub use fetch::fetch_details;
pub use types::{permalink, Category, Item};
