// Provider configuration and client construction
// One place builds the HTTP client; sessions and handlers receive it injected

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::openai::OpenAIClient;
use crate::traits::ChatClient;

/// DashScope's OpenAI-compatible endpoint
pub const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com/compatible-mode/v1";

pub const API_KEY_ENV: &str = "LLM_API_KEY";
/// Older deployments exported the key under this name
pub const LEGACY_API_KEY_ENV: &str = "AliLLM";
pub const BASE_URL_ENV: &str = "LLM_BASE_URL";
pub const TIMEOUT_ENV: &str = "LLM_TIMEOUT_SECS";

/// Connection settings for an OpenAI-compatible provider
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Whole-request timeout; unset means the transport never times out on its own
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Read `LLM_API_KEY` (or legacy `AliLLM`), `LLM_BASE_URL` and `LLM_TIMEOUT_SECS`
    ///
    /// A missing or empty key is an error; callers treat it as fatal at startup.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same rules as [`from_env`](Self::from_env), reading through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = api_key_from_lookup(&lookup)?;

        let mut config = Self::new(api_key);

        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|url| !url.trim().is_empty()) {
            config.base_url = base_url;
        }

        if let Some(secs) = lookup(TIMEOUT_ENV) {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", TIMEOUT_ENV))?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

/// The credential: `LLM_API_KEY`, else legacy `AliLLM`; blank values count as unset
pub fn api_key_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
    let present = |name: &str| lookup(name).filter(|key| !key.trim().is_empty());

    present(API_KEY_ENV)
        .or_else(|| present(LEGACY_API_KEY_ENV))
        .with_context(|| {
            format!(
                "{} environment variable is required (or legacy {})",
                API_KEY_ENV, LEGACY_API_KEY_ENV
            )
        })
}

/// Factory for creating chat clients from configuration
pub struct ClientFactory;

impl ClientFactory {
    pub fn create_chat_client(config: &ProviderConfig) -> Result<Arc<dyn ChatClient>> {
        let client = OpenAIClient::from_config(config)?;
        tracing::debug!(base_url = %client.base_url(), "Created chat client");
        Ok(Arc::new(client))
    }
}
