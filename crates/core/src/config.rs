//! Application configuration
//!
//! Everything is read from `VOLTBAY_*` environment variables at startup
//! (nested keys use `__`, e.g. `VOLTBAY__API__BASE_URL`). Payment and
//! assistant credentials are optional: a missing key disables that
//! feature instead of failing the whole client.

use config::{Config, Environment};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_ASSISTANT_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub payment: PaymentConfig,
    pub assistant: AssistantConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Backend base URL, e.g. `http://localhost:5000/api`.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Payment gateway settings. The gateway itself is external; the client
/// only needs the app id to request redirect URLs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentConfig {
    pub app_id: Option<String>,
    pub callback_url: Option<String>,
}

impl PaymentConfig {
    pub fn is_configured(&self) -> bool {
        self.app_id.is_some()
    }
}

/// Generative-assistant settings (external completion API).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub api_key: Option<String>,
    pub model: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_ASSISTANT_MODEL.to_string(),
        }
    }
}

impl AssistantConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl AppConfig {
    /// Load and validate configuration from the environment.
    pub fn load() -> CoreResult<Self> {
        let cfg = builder()
            .add_source(
                Environment::with_prefix("VOLTBAY")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .map_err(|err| CoreError::invalid_config(err.to_string()))?;
        Self::from_config(cfg)
    }

    fn from_config(cfg: Config) -> CoreResult<Self> {
        let app: Self = cfg
            .try_deserialize()
            .map_err(|err| CoreError::invalid_config(err.to_string()))?;
        app.validate()?;
        Ok(app)
    }

    /// Check invariants that serde alone cannot express.
    pub fn validate(&self) -> CoreResult<()> {
        url::Url::parse(&self.api.base_url).map_err(|err| {
            CoreError::invalid_config(format!("api.base_url is not a valid URL: {err}"))
        })?;
        if self.api.timeout_secs == 0 {
            return Err(CoreError::invalid_config(
                "api.timeout_secs must be at least 1",
            ));
        }
        Ok(())
    }
}

fn builder() -> config::ConfigBuilder<config::builder::DefaultState> {
    Config::builder()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_environment() {
        let cfg = builder().build().unwrap();
        let app = AppConfig::from_config(cfg).unwrap();
        assert_eq!(app.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(app.api.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(!app.payment.is_configured());
        assert!(!app.assistant.is_configured());
    }

    #[test]
    fn overrides_reach_nested_fields() {
        let cfg = builder()
            .set_override("api.base_url", "https://api.voltbay.dev")
            .unwrap()
            .set_override("payment.app_id", "zp-553")
            .unwrap()
            .build()
            .unwrap();
        let app = AppConfig::from_config(cfg).unwrap();
        assert_eq!(app.api.base_url, "https://api.voltbay.dev");
        assert!(app.payment.is_configured());
        // Assistant stays disabled without a key
        assert!(!app.assistant.is_configured());
        assert_eq!(app.assistant.model, DEFAULT_ASSISTANT_MODEL);
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let cfg = builder()
            .set_override("api.base_url", "not a url")
            .unwrap()
            .build()
            .unwrap();
        let err = AppConfig::from_config(cfg).unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig { .. }));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let app = AppConfig {
            api: ApiConfig {
                timeout_secs: 0,
                ..ApiConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(app.validate().is_err());
    }
}
