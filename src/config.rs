//! Configuration loading
//!
//! YAML configuration with `${ENV_VAR}` substitution in string values,
//! so API keys stay out of checked-in files.

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static pattern"));

fn default_step_days() -> u32 {
    30
}

/// Extractor configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// API key attached to every request
    pub api_key: String,

    /// Usernames to extract; one partition each
    pub usernames: Vec<String>,

    /// Optional User-Agent header value
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Optional global floor for the scrobbles window start
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,

    /// Window span in days for the scrobbles cursor
    #[serde(default = "default_step_days")]
    pub step_days: u32,

    /// Path to the checkpoint state file
    #[serde(default)]
    pub state_path: Option<PathBuf>,

    /// Path for JSONL output (stdout when unset)
    #[serde(default)]
    pub output_path: Option<PathBuf>,

    /// Transport tuning
    #[serde(default)]
    pub http: HttpSettings,
}

/// Transport tuning knobs
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSettings {
    /// Base URL override (defaults to the audioscrobbler endpoint)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "HttpSettings::default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum retry attempts per request
    #[serde(default = "HttpSettings::default_max_retries")]
    pub max_retries: u32,

    /// Requests per second
    #[serde(default = "HttpSettings::default_requests_per_second")]
    pub requests_per_second: u32,
}

impl HttpSettings {
    fn default_timeout_secs() -> u64 {
        30
    }

    fn default_max_retries() -> u32 {
        3
    }

    fn default_requests_per_second() -> u32 {
        5
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: Self::default_timeout_secs(),
            max_retries: Self::default_max_retries(),
            requests_per_second: Self::default_requests_per_second(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
            message: format!(
                "Failed to read config file {}: {e}",
                path.as_ref().display()
            ),
        })?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let substituted = substitute_env_vars(contents)?;
        let config: Config = serde_yaml::from_str(&substituted)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate required fields and value ranges
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(Error::missing_field("api_key"));
        }
        if self.usernames.is_empty() {
            return Err(Error::missing_field("usernames"));
        }
        if self.usernames.iter().any(String::is_empty) {
            return Err(Error::InvalidConfigValue {
                field: "usernames".to_string(),
                message: "usernames must be non-empty strings".to_string(),
            });
        }
        if self.step_days == 0 {
            return Err(Error::InvalidConfigValue {
                field: "step_days".to_string(),
                message: "step_days must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Build the HTTP client configuration for this extractor config
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.http.timeout_secs))
            .max_retries(self.http.max_retries)
            .rate_limit(RateLimiterConfig::new(
                self.http.requests_per_second,
                self.http.requests_per_second,
            ));

        if let Some(ref base_url) = self.http.base_url {
            builder = builder.base_url(base_url.clone());
        }
        if let Some(ref agent) = self.user_agent {
            builder = builder.user_agent(agent.clone());
        }

        builder.build()
    }
}

/// Replace `${VAR}` references with environment variable values
fn substitute_env_vars(contents: &str) -> Result<String> {
    let mut missing = Vec::new();
    let substituted = ENV_VAR_PATTERN.replace_all(contents, |caps: &regex::Captures<'_>| {
        let name = &caps[1];
        match std::env::var(name) {
            Ok(value) => value,
            Err(_) => {
                missing.push(name.to_string());
                String::new()
            }
        }
    });

    if missing.is_empty() {
        Ok(substituted.into_owned())
    } else {
        Err(Error::Config {
            message: format!("Undefined environment variable(s): {}", missing.join(", ")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "api_key: abc123\nusernames:\n  - alice\n  - bob\n";

    #[test]
    fn test_minimal_config() {
        let config = Config::from_yaml(MINIMAL).unwrap();
        assert_eq!(config.api_key, "abc123");
        assert_eq!(config.usernames, vec!["alice", "bob"]);
        assert_eq!(config.step_days, 30);
        assert!(config.start_date.is_none());
        assert_eq!(config.http.requests_per_second, 5);
    }

    #[test]
    fn test_full_config() {
        let yaml = r"
api_key: abc123
usernames: [alice]
user_agent: my-pipeline/1.0
start_date: 2020-01-01T00:00:00Z
step_days: 7
state_path: /tmp/state.json
output_path: /tmp/out.jsonl
http:
  timeout_secs: 10
  max_retries: 5
  requests_per_second: 2
";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.step_days, 7);
        assert_eq!(
            config.start_date,
            Some("2020-01-01T00:00:00Z".parse().unwrap())
        );
        assert_eq!(config.http.max_retries, 5);

        let http = config.http_client_config();
        assert_eq!(http.timeout, Duration::from_secs(10));
        assert_eq!(http.user_agent, "my-pipeline/1.0");
    }

    #[test]
    fn test_missing_api_key_rejected() {
        let err = Config::from_yaml("api_key: \"\"\nusernames: [alice]\n").unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "api_key"));
    }

    #[test]
    fn test_empty_usernames_rejected() {
        let err = Config::from_yaml("api_key: abc\nusernames: []\n").unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "usernames"));
    }

    #[test]
    fn test_zero_step_days_rejected() {
        let err =
            Config::from_yaml("api_key: abc\nusernames: [alice]\nstep_days: 0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "step_days"));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("LASTFM_TEST_KEY", "from-env");
        let config =
            Config::from_yaml("api_key: ${LASTFM_TEST_KEY}\nusernames: [alice]\n").unwrap();
        assert_eq!(config.api_key, "from-env");
    }

    #[test]
    fn test_undefined_env_var_is_error() {
        let err = Config::from_yaml("api_key: ${LASTFM_SURELY_UNSET_VAR}\nusernames: [alice]\n")
            .unwrap_err();
        assert!(err.to_string().contains("LASTFM_SURELY_UNSET_VAR"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(Config::from_yaml("api_key: abc\nusernames: [alice]\nshoe_size: 9\n").is_err());
    }
}
