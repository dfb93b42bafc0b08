use mib_core::{Error, Result};
use std::fmt;
use std::time::Duration;
use url::Url;

pub mod models;

pub const ENV_API_KEY: &str = "GOOGLE_API_KEY";
pub const ENV_MODEL: &str = "GEMINI_MODEL";
pub const ENV_BASE_URL: &str = "GEMINI_BASE_URL";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Where to create a Google AI Studio key.
pub const API_KEY_SETUP_URL: &str = "https://makersuite.google.com/app/apikey";

/// Model client configuration, loaded once at start-up.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub model_name: String,
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model_name: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "{} is not set in the environment or .env file. Get your free key from {}",
                    ENV_API_KEY, API_KEY_SETUP_URL
                ))
            })?;

        let mut config = Self::new(api_key);
        if let Some(model) = lookup(ENV_MODEL).filter(|m| !m.trim().is_empty()) {
            config = config.with_model_name(model.trim());
        }
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|u| !u.trim().is_empty()) {
            config = config.with_base_url(base_url.trim())?;
        }
        Ok(config)
    }

    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| Error::Configuration(format!("Invalid base URL {}: {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Configuration(format!(
                "Invalid base URL {}: expected http or https",
                base_url
            )));
        }
        self.base_url = base_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

pub mod prelude {
    pub use super::models::{create_model, DummyModel, GeminiModel, ModelKind};
    pub use super::Config;
    pub use mib_core::{Error, ModelInfo, Result, ValidatedImage, VisionModel};
}

pub use models::{create_model, ModelKind};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_fails() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        let message = err.to_string();
        assert!(message.contains(ENV_API_KEY));
        assert!(message.contains(API_KEY_SETUP_URL));

        // Blank counts as missing
        assert!(Config::from_lookup(lookup(&[(ENV_API_KEY, "   ")])).is_err());
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[(ENV_API_KEY, "secret")])).unwrap();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.model_name, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            (ENV_API_KEY, "secret"),
            (ENV_MODEL, "gemini-1.5-pro"),
            (ENV_BASE_URL, "http://localhost:9999/"),
        ]))
        .unwrap();
        assert_eq!(config.model_name, "gemini-1.5-pro");
        assert_eq!(config.base_url, "http://localhost:9999");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(Config::new("k").with_base_url("not a url").is_err());
        assert!(Config::new("k").with_base_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", Config::new("super-secret-key"));
        assert!(!rendered.contains("super-secret-key"));
        assert!(rendered.contains("<redacted>"));
    }
}
