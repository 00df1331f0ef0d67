//! Configuration structures
//!
//! Loaded by `mailbridge_infra::config` from environment variables or a
//! JSON/TOML file. Every field has a default, so an empty file is valid.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BASE_BACKOFF_MS, DEFAULT_CALL_BUDGET_SECS, DEFAULT_HTTP_TIMEOUT_SECS,
    DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_BACKOFF_MS,
};
use crate::errors::{PlatformError, Result};
use crate::types::Platform;

/// Top-level MailBridge configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpSettings,
    /// Per-platform base URL overrides keyed by platform identifier
    /// (`mailchimp`, `sendgrid`, ...). Used for sandboxes and tests.
    #[serde(default)]
    pub base_urls: BTreeMap<String, String>,
}

impl Config {
    /// Base URL override for a platform, if configured.
    pub fn base_url_for(&self, platform: Platform) -> Option<&str> {
        self.base_urls.get(platform.as_str()).map(|url| url.trim_end_matches('/'))
    }

    /// Reject settings that would make every call fail.
    pub fn validate(&self) -> Result<()> {
        self.http.validate()?;

        for (key, url) in &self.base_urls {
            Platform::parse(key).map_err(|_| {
                PlatformError::Config(format!("base_urls contains unknown platform '{key}'"))
            })?;
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(PlatformError::Config(format!(
                    "base URL for '{key}' must start with http:// or https://"
                )));
            }
        }

        Ok(())
    }
}

/// HTTP transport settings shared by all adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Per-attempt request timeout.
    pub timeout_secs: u64,
    /// Overall budget for one adapter call, retries and backoff included.
    pub call_budget_secs: u64,
    /// Total attempts (initial try + retries).
    pub max_attempts: u32,
    pub base_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub user_agent: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            call_budget_secs: DEFAULT_CALL_BUDGET_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_backoff_ms: DEFAULT_BASE_BACKOFF_MS,
            max_backoff_ms: DEFAULT_MAX_BACKOFF_MS,
            user_agent: None,
        }
    }
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn call_budget(&self) -> Duration {
        Duration::from_secs(self.call_budget_secs)
    }

    pub fn base_backoff(&self) -> Duration {
        Duration::from_millis(self.base_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(PlatformError::Config("http.timeout_secs must be greater than 0".into()));
        }
        if self.call_budget_secs < self.timeout_secs {
            return Err(PlatformError::Config(
                "http.call_budget_secs must be at least http.timeout_secs".into(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(PlatformError::Config("http.max_attempts must be greater than 0".into()));
        }
        if self.max_backoff_ms < self.base_backoff_ms {
            return Err(PlatformError::Config(
                "http.max_backoff_ms must be at least http.base_backoff_ms".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn unknown_base_url_key_is_rejected() {
        let mut config = Config::default();
        config.base_urls.insert("fax".into(), "https://fax.example".into());

        match config.validate() {
            Err(PlatformError::Config(msg)) => assert!(msg.contains("fax")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn zero_attempts_is_rejected() {
        let config = Config {
            http: HttpSettings { max_attempts: 0, ..HttpSettings::default() },
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn base_url_lookup_strips_trailing_slash() {
        let mut config = Config::default();
        config.base_urls.insert("sendgrid".into(), "http://127.0.0.1:9000/".into());
        assert_eq!(config.base_url_for(Platform::SendGrid), Some("http://127.0.0.1:9000"));
        assert_eq!(config.base_url_for(Platform::Brevo), None);
    }
}
