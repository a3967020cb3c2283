//! LLM adapter: the capability port used by the interpreter and the narrator,
//! plus concrete providers (OpenAI-compatible chat completions, mock, disabled).

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;

// ------------------------------------------------------------
// Public surface
// ------------------------------------------------------------

/// Boxed future returned by [`LlmClient::complete`].
pub type CompletionFuture<'a> = Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;

/// Text-in/text-out capability. Output is free text; callers must not assume
/// it follows any format the system message asked for.
pub trait LlmClient: Send + Sync {
    fn complete<'a>(&'a self, system: &'a str, user: &'a str) -> CompletionFuture<'a>;
    /// Provider name for diagnostics.
    fn provider_name(&self) -> &'static str;
}

/// Convenient alias used by callers.
pub type DynLlmClient = Arc<dyn LlmClient>;

/// Factory: build a client according to config and environment variables.
///
/// * If `AI_TEST_MODE=mock`, returns a deterministic mock client.
/// * Else if `config.enabled==false`, returns a disabled client.
/// * Else builds the OpenAI-compatible provider.
pub fn build_client_from_config(config: &LlmConfig) -> Result<DynLlmClient> {
    if std::env::var("AI_TEST_MODE")
        .map(|v| v == "mock")
        .unwrap_or(false)
    {
        return Ok(Arc::new(MockProvider::new("Here is what I found on Hacker News (mock).")));
    }

    if !config.enabled {
        return Ok(Arc::new(DisabledClient));
    }

    match config.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAiProvider::new(config)?)),
        other => bail!("Unsupported LLM provider in config: {other}"),
    }
}

// ------------------------------------------------------------
// Providers
// ------------------------------------------------------------

/// OpenAI chat completions (or any compatible endpoint). Requires an API key.
pub struct OpenAiProvider {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
    temperature: f32,
}

impl OpenAiProvider {
    pub fn new(cfg: &LlmConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("hn-agent/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("building llm http client")?;
        Ok(Self {
            http,
            api_key: cfg.api_key.clone(),
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
            model: cfg.model.clone(),
            temperature: cfg.temperature,
        })
    }

    async fn chat(&self, system: &str, user: &str) -> Result<String> {
        if self.api_key.is_empty() {
            bail!("missing OPENAI_API_KEY");
        }

        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMsg,
        }
        #[derive(Deserialize)]
        struct ChoiceMsg {
            #[serde(default)]
            content: Option<String>,
        }

        let req = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: system,
                },
                Msg {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
        };

        let resp = self
            .http
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .context("chat completions post()")?;

        if !resp.status().is_success() {
            bail!("chat completions: status {}", resp.status());
        }
        let body: Resp = resp.json().await.context("chat completions json")?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow!("chat completions: empty choices"))
    }
}

impl LlmClient for OpenAiProvider {
    fn complete<'a>(&'a self, system: &'a str, user: &'a str) -> CompletionFuture<'a> {
        Box::pin(self.chat(system, user))
    }
    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

/// Fails every call; used when the LLM is disabled so callers take their fallbacks.
pub struct DisabledClient;

impl LlmClient for DisabledClient {
    fn complete<'a>(&'a self, _system: &'a str, _user: &'a str) -> CompletionFuture<'a> {
        Box::pin(async { Err(anyhow!("llm disabled")) })
    }
    fn provider_name(&self) -> &'static str {
        "disabled"
    }
}

/// Returns the same reply for every call; for tests/local runs.
#[derive(Clone)]
pub struct MockProvider {
    pub fixed: String,
}

impl MockProvider {
    pub fn new(fixed: impl Into<String>) -> Self {
        Self {
            fixed: fixed.into(),
        }
    }
}

impl LlmClient for MockProvider {
    fn complete<'a>(&'a self, _system: &'a str, _user: &'a str) -> CompletionFuture<'a> {
        let out = self.fixed.clone();
        Box::pin(async move { Ok(out) })
    }
    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_client_always_errors() {
        let c = DisabledClient;
        assert!(c.complete("sys", "hi").await.is_err());
    }

    #[tokio::test]
    async fn openai_without_key_errors_before_network() {
        let cfg = LlmConfig {
            api_key: String::new(),
            api_base: "http://127.0.0.1:9".into(),
            ..LlmConfig::default()
        };
        let p = OpenAiProvider::new(&cfg).unwrap();
        let err = p.complete("sys", "hi").await.unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[serial_test::serial]
    #[test]
    fn factory_respects_enabled_flag_and_provider() {
        std::env::remove_var("AI_TEST_MODE");
        let off = LlmConfig {
            enabled: false,
            ..LlmConfig::default()
        };
        assert_eq!(build_client_from_config(&off).unwrap().provider_name(), "disabled");

        let bogus = LlmConfig {
            provider: "claude".into(),
            ..LlmConfig::default()
        };
        assert!(build_client_from_config(&bogus).is_err());

        std::env::set_var("AI_TEST_MODE", "mock");
        assert_eq!(build_client_from_config(&bogus).unwrap().provider_name(), "mock");
        std::env::remove_var("AI_TEST_MODE");
    }
}
