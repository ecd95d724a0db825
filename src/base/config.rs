//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc};

use serde::Deserialize;

use crate::base::catalog::MediaStrategy;

use super::types::Res;

/// Default OpenAI model to use
fn default_openai_model() -> String {
    "gpt-4o".to_string()
}

/// Default sampling temperature for the intake model
fn default_openai_temperature() -> f32 {
    0.2
}

/// Default max output tokens for the intake model
fn default_openai_max_tokens() -> u32 {
    2000
}

/// Default timeout for a single LLM call, in seconds
fn default_llm_timeout_secs() -> u64 {
    30
}

/// Default bind address for the HTTP server
fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

/// Default directory of locally served media assets
fn default_assets_dir() -> String {
    "assets".to_string()
}

/// Default session time-to-live, in seconds
fn default_session_ttl_secs() -> u64 {
    3600
}

/// Default cap on concurrently retained sessions
fn default_max_sessions() -> usize {
    1024
}

/// Configuration for the velfie application.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// OpenAI API key (`VELFIE_OPENAI_API_KEY`). Required; the process refuses to start without it.
    pub openai_api_key: String,
    /// OpenAI model to use (`VELFIE_OPENAI_MODEL`).
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    /// Sampling temperature (`VELFIE_OPENAI_TEMPERATURE`).
    /// Value between 0 and 2. Higher values like 0.8 make output more random,
    /// while lower values like 0.2 make it more focused and deterministic.
    #[serde(default = "default_openai_temperature")]
    pub openai_temperature: f32,
    /// Max output tokens per completion (`VELFIE_OPENAI_MAX_TOKENS`).
    #[serde(default = "default_openai_max_tokens")]
    pub openai_max_tokens: u32,
    /// Timeout for a single LLM call in seconds (`VELFIE_LLM_TIMEOUT_SECS`).
    /// Expiry is treated the same as any other provider failure.
    #[serde(default = "default_llm_timeout_secs")]
    pub llm_timeout_secs: u64,
    /// HTTP bind address (`VELFIE_BIND_ADDR`).
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Directory served under `/assets` (`VELFIE_ASSETS_DIR`).
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,
    /// Media embed scheme: `youtube` or `local` (`VELFIE_MEDIA_STRATEGY`).
    #[serde(default)]
    pub media_strategy: MediaStrategy,
    /// Session time-to-live in seconds (`VELFIE_SESSION_TTL_SECS`).
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
    /// Cap on concurrently retained sessions (`VELFIE_MAX_SESSIONS`).
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            openai_model: default_openai_model(),
            openai_temperature: default_openai_temperature(),
            openai_max_tokens: default_openai_max_tokens(),
            llm_timeout_secs: default_llm_timeout_secs(),
            bind_addr: default_bind_addr(),
            assets_dir: default_assets_dir(),
            media_strategy: MediaStrategy::default(),
            session_ttl_secs: default_session_ttl_secs(),
            max_sessions: default_max_sessions(),
        }
    }
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("VELFIE"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new("velfie.toml").exists() {
            cfg = cfg.add_source(config::File::with_name("velfie"));
        }

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    pub fn validate(&self) -> Res<()> {
        if self.openai_api_key.trim().is_empty() {
            return Err(anyhow::anyhow!("OpenAI API key not found. Please set the VELFIE_OPENAI_API_KEY environment variable."));
        }

        if self.openai_temperature < 0.0 || self.openai_temperature > 2.0 {
            return Err(anyhow::anyhow!("OpenAI temperature must be between 0 and 2."));
        }

        if self.openai_max_tokens < 1 || self.openai_max_tokens > 16384 {
            return Err(anyhow::anyhow!("OpenAI max tokens must be between 1 and 16384."));
        }

        if self.llm_timeout_secs == 0 {
            return Err(anyhow::anyhow!("LLM timeout must be at least 1 second."));
        }

        if self.max_sessions == 0 {
            return Err(anyhow::anyhow!("Max sessions must be at least 1."));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(mutate: impl FnOnce(&mut ConfigInner)) -> Config {
        let mut inner = ConfigInner {
            openai_api_key: "test_key".to_string(),
            ..Default::default()
        };
        mutate(&mut inner);

        Config { inner: Arc::new(inner) }
    }

    #[test]
    fn defaults_are_valid() {
        let config = config_with(|_| {});

        assert!(config.validate().is_ok());
        assert_eq!(config.openai_model, "gpt-4o");
        assert_eq!(config.media_strategy, MediaStrategy::Youtube);
        assert_eq!(config.session_ttl_secs, 3600);
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let config = config_with(|inner| inner.openai_api_key = "  ".to_string());

        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_temperature_is_rejected() {
        let config = config_with(|inner| inner.openai_temperature = 2.5);

        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_session_cap_is_rejected() {
        let config = config_with(|inner| inner.max_sessions = 0);

        assert!(config.validate().is_err());
    }
}
