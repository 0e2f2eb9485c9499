use config::{builder::DefaultState, Config as ConfigLoader, ConfigBuilder, ConfigError, File};
use serde::Deserialize;
use std::time::Duration;

use deepchat_llm::config::{api_key_from_lookup, API_KEY_ENV, DEFAULT_BASE_URL};
use deepchat_llm::ProviderConfig;

/// Environment prefixes and the config section each one overrides
const ENV_SECTIONS: &[(&str, &str)] = &[("SERVER_", "server"), ("LLM_", "llm"), ("LOG_", "logging")];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub llm_api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Off unless set; streamed replies can run long
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Used when a request names no model
    pub model: String,
    /// Used when a request sets no temperature
    pub temperature: f32,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "deepseek-r1".to_string(),
            temperature: 0.7,
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables (SERVER_, LLM_ and LOG_ prefixes)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            // 1. Load default config
            .add_source(File::with_name("config/default").required(false))
            // 2. Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false));

        // 3. Environment variables override everything
        let cfg = Self::build(builder, std::env::vars())?;

        // Load secrets from ENV (not in TOML)
        cfg.with_secrets(|name| std::env::var(name).ok())
    }

    /// Fill in the provider key; missing or blank is an error
    pub fn with_secrets(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        self.llm_api_key = api_key_from_lookup(lookup)
            .map_err(|e| ConfigError::Message(format!("{:#}", e)))?;
        Ok(self)
    }

    /// Apply prefixed variables on top of `builder` and deserialize
    ///
    /// `LLM_BASE_URL` lands on `llm.base_url`: only the prefix picks the
    /// section, the rest of the name is the field. Secrets are skipped.
    pub fn build<I>(mut builder: ConfigBuilder<DefaultState>, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            if name == API_KEY_ENV {
                continue;
            }
            for (prefix, section) in ENV_SECTIONS {
                if let Some(field) = name.strip_prefix(prefix) {
                    if !field.is_empty() {
                        builder = builder.set_override(format!("{}.{}", section, field.to_lowercase()), value.clone())?;
                    }
                }
            }
        }

        builder.build()?.try_deserialize()
    }

    /// Provider settings for the shared chat client
    pub fn provider(&self) -> ProviderConfig {
        let provider = ProviderConfig::new(self.llm_api_key.clone()).with_base_url(self.llm.base_url.clone());

        match self.llm.timeout_secs {
            Some(secs) => provider.with_timeout(Duration::from_secs(secs)),
            None => provider,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    const TOML: &str = r#"
        [server]
        host = "127.0.0.1"
        port = 3000

        [cors]
        enabled = true
        origins = ["http://localhost:3000"]

        [llm]
        model = "deepseek-r1"
        temperature = 0.5

        [logging]
        level = "debug"
        format = "json"
    "#;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_config_structure() {
        let config: Config = toml::from_str(TOML).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.request_timeout_secs, None);
        assert_eq!(config.llm.model, "deepseek-r1");
        assert_eq!(config.llm.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.logging.format, "json");
        assert!(config.llm_api_key.is_empty());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.cors.origins, vec!["*"]);
        assert_eq!(config.llm.temperature, 0.7);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_env_overrides_sections() {
        let builder = ConfigLoader::builder().add_source(File::from_str(TOML, FileFormat::Toml));

        let config = Config::build(
            builder,
            vars(&[
                ("SERVER_PORT", "9090"),
                ("SERVER_REQUEST_TIMEOUT_SECS", "60"),
                ("LLM_MODEL", "qwen-plus"),
                ("LLM_BASE_URL", "http://localhost:8080/v1"),
                ("LLM_API_KEY", "sk-secret"),
                ("LOG_LEVEL", "warn"),
                ("PATH", "/usr/bin"),
            ]),
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.request_timeout_secs, Some(60));
        assert_eq!(config.llm.model, "qwen-plus");
        assert_eq!(config.llm.base_url, "http://localhost:8080/v1");
        assert_eq!(config.logging.level, "warn");
        assert!(config.llm_api_key.is_empty());
    }

    #[test]
    fn test_secrets_reject_blank_key() {
        let config: Config = toml::from_str(TOML).unwrap();

        let blank = |name: &str| (name == API_KEY_ENV).then(String::new);
        assert!(config.clone().with_secrets(blank).is_err());

        let legacy = |name: &str| match name {
            "LLM_API_KEY" => Some(String::new()),
            "AliLLM" => Some("sk-legacy".to_string()),
            _ => None,
        };
        assert_eq!(config.with_secrets(legacy).unwrap().llm_api_key, "sk-legacy");
    }

    #[test]
    fn test_provider_config() {
        let mut config: Config = toml::from_str(TOML).unwrap();
        config.llm_api_key = "sk-test".to_string();
        config.llm.timeout_secs = Some(30);

        let provider = config.provider();

        assert_eq!(provider.api_key, "sk-test");
        assert_eq!(provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(provider.timeout, Some(Duration::from_secs(30)));
    }
}
