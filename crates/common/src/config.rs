//! Client configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

/// Environment variable that overrides the configured API key
pub const API_KEY_ENV: &str = "CLOUDAMQP_APIKEY";

/// Control-plane client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the control-plane API
    pub base_url: String,

    /// API key, sent as the basic-auth password
    pub api_key: String,

    /// Per-request timeout
    pub request_timeout_secs: u64,

    /// Reconciliation polling
    pub poll: PollSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://customer.cloudamqp.com".to_string(),
            api_key: String::new(),
            request_timeout_secs: 60,
            poll: PollSettings::default(),
        }
    }
}

/// Bounds for the reconciliation poll loop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollSettings {
    /// Wait between two reads of a pending resource
    pub interval_secs: u64,

    /// Wait before the first read after a plugin change is accepted
    pub initial_delay_secs: u64,

    /// Give up after this many reads; unbounded when absent
    pub max_attempts: Option<u32>,

    /// Give up after this much wall time; unbounded when absent
    pub timeout_secs: Option<u64>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            initial_delay_secs: 10,
            max_attempts: Some(90),
            timeout_secs: Some(1800),
        }
    }
}

impl PollSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_secs(self.initial_delay_secs)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl ClientConfig {
    /// Load configuration from file, falling back to defaults
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply the API key from the environment, if set
    pub fn with_env(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                self.api_key = key;
            }
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::InvalidConfig("base_url is empty".to_string()));
        }
        if self.api_key.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "api_key is empty (set it in the config file or {})",
                API_KEY_ENV
            )));
        }
        if self.poll.interval_secs == 0 {
            return Err(Error::InvalidConfig("poll.interval_secs must be positive".to_string()));
        }
        if self.poll.max_attempts == Some(0) {
            return Err(Error::InvalidConfig("poll.max_attempts must be positive".to_string()));
        }
        if self.poll.timeout_secs == Some(0) {
            return Err(Error::InvalidConfig("poll.timeout_secs must be positive".to_string()));
        }
        if self.poll.max_attempts.is_none() && self.poll.timeout_secs.is_none() {
            return Err(Error::InvalidConfig(
                "poll needs max_attempts or timeout_secs".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_control_plane_cadence() {
        let config = ClientConfig::default();
        assert_eq!(config.poll.interval(), Duration::from_secs(10));
        assert_eq!(config.poll.initial_delay(), Duration::from_secs(10));
        assert_eq!(config.poll.max_attempts, Some(90));
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "api_key = \"secret\"\n\n[poll]\ninterval_secs = 2\nmax_attempts = 5"
        )
        .unwrap();

        let config = ClientConfig::load(file.path()).unwrap();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.base_url, "https://customer.cloudamqp.com");
        assert_eq!(config.poll.interval_secs, 2);
        assert_eq!(config.poll.max_attempts, Some(5));
        assert_eq!(config.poll.initial_delay_secs, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = ClientConfig::load(Path::new("/nonexistent/amqpctl.toml")).unwrap();
        assert_eq!(config.request_timeout_secs, 60);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ClientConfig::default();
        assert!(config.validate().is_err());

        config.api_key = "secret".to_string();
        config.poll.interval_secs = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        config.poll.interval_secs = 10;
        config.poll.max_attempts = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_requires_a_poll_bound() {
        let mut config = ClientConfig::default();
        config.api_key = "secret".to_string();

        config.poll.max_attempts = None;
        assert!(config.validate().is_ok());

        config.poll.timeout_secs = None;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        config.poll.max_attempts = Some(3);
        assert!(config.validate().is_ok());

        config.poll.timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }
}
