use crate::errors::ConfigError;
use std::{env, time::Duration};

pub const DEFAULT_BASE_URL: &str = "https://api.habitify.me";
const DEFAULT_PORT: u16 = 8080;

/// Everything a [`crate::HabitifyClient`] needs; one instance per client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    /// Default per-call deadline handed to each client operation.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub client: ClientConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("HABITIFY_API_KEY")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let mut client = ClientConfig::new(api_key);
        if let Some(base_url) = lookup("HABITIFY_BASE_URL").filter(|value| !value.is_empty()) {
            client = client.with_base_url(base_url);
        }
        if let Some(raw) = lookup("HABITIFY_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidValue {
                    name: "HABITIFY_TIMEOUT_SECS",
                    value: raw.clone(),
                })?;
            client = client.with_timeout(Duration::from_secs(secs));
        }

        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        Ok(Self { port, client })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let err = from_pairs(&[("PORT", "9000")]).unwrap_err();
        assert_eq!(err, ConfigError::MissingApiKey);

        let err = from_pairs(&[("HABITIFY_API_KEY", "  ")]).unwrap_err();
        assert_eq!(err, ConfigError::MissingApiKey);
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = from_pairs(&[("HABITIFY_API_KEY", "secret")]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.client.api_key, "secret");
        assert_eq!(config.client.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.client.timeout, None);
    }

    #[test]
    fn overrides_are_read() {
        let config = from_pairs(&[
            ("HABITIFY_API_KEY", "secret"),
            ("HABITIFY_BASE_URL", "http://127.0.0.1:4000/"),
            ("HABITIFY_TIMEOUT_SECS", "15"),
            ("PORT", "3000"),
        ])
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.client.base_url, "http://127.0.0.1:4000");
        assert_eq!(config.client.timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = from_pairs(&[
            ("HABITIFY_API_KEY", "secret"),
            ("HABITIFY_TIMEOUT_SECS", "soon"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                name: "HABITIFY_TIMEOUT_SECS",
                value: "soon".to_string(),
            }
        );
    }
}
