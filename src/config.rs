use std::time::Duration;
use thiserror::Error;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Runtime settings, read from the environment after `.env` is loaded
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub email: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_url = non_empty("PORTAL_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: "PORTAL_API_URL",
                value: api_url,
            });
        }

        let timeout = match non_empty("PORTAL_TIMEOUT_SECS") {
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "PORTAL_TIMEOUT_SECS",
                        value: raw,
                    })
                }
            },
        };

        Ok(Config {
            api_url: api_url.trim_end_matches('/').to_string(),
            email: non_empty("PORTAL_EMAIL"),
            password: lookup("PORTAL_PASSWORD").filter(|v| !v.is_empty()),
            timeout,
        })
    }

    /// Credentials for logging in at start, when both are configured
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.email, &self.password) {
            (Some(email), Some(password)) => Some((email.as_str(), password.as_str())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORTAL_API_URL", "https://bank.example.np/api/"),
            ("PORTAL_TIMEOUT_SECS", "5"),
            ("PORTAL_EMAIL", "sita@example.np"),
            ("PORTAL_PASSWORD", "s3cret"),
        ])
        .unwrap();

        assert_eq!(config.api_url, "https://bank.example.np/api");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.credentials(), Some(("sita@example.np", "s3cret")));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config_from(&[("PORTAL_TIMEOUT_SECS", "soon")]),
            Err(ConfigError::Invalid { key: "PORTAL_TIMEOUT_SECS", .. })
        ));
        assert!(config_from(&[("PORTAL_TIMEOUT_SECS", "0")]).is_err());
        assert!(config_from(&[("PORTAL_API_URL", "bank.example.np")]).is_err());
    }
}
