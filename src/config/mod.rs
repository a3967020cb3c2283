// src/config/mod.rs
//! Service configuration: `config/agent.toml` (or `$AGENT_CONFIG_PATH`) plus env overrides.

pub mod llm;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub use llm::LlmConfig;

pub const ENV_CONFIG_PATH: &str = "AGENT_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/agent.toml";

fn default_base_url() -> String {
    "https://hacker-news.firebaseio.com/v0".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_connect_timeout_secs() -> u64 {
    4
}

#[derive(Debug, Clone, Deserialize)]
pub struct HnConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HnConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentConfig {
    #[serde(default)]
    pub hn: HnConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

impl AgentConfig {
    /// Parse a TOML file and apply env overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading agent config from {}", path.display()))?;
        let mut cfg: AgentConfig = toml::from_str(&content)
            .with_context(|| format!("parsing agent config {}", path.display()))?;
        cfg.apply_env();
        Ok(cfg)
    }

    /// Resolve config using env var + fallbacks:
    /// 1) $AGENT_CONFIG_PATH (must exist)
    /// 2) config/agent.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            return Self::load_from(&pb);
        }
        let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_p.exists() {
            return Self::load_from(&default_p);
        }
        let mut cfg = AgentConfig::default();
        cfg.apply_env();
        Ok(cfg)
    }

    fn apply_env(&mut self) {
        if let Ok(base) = std::env::var("HN_API_BASE") {
            if !base.trim().is_empty() {
                self.hn.base_url = base.trim().to_string();
            }
        }
        if self.hn.timeout_secs == 0 {
            self.hn.timeout_secs = default_timeout_secs();
        }
        self.llm.resolve();
    }
}
