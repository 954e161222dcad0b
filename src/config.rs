use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{BurnoutError, BurnoutResult};

pub const DEFAULT_AT_RISK_THRESHOLD: f64 = 55.0;
pub const DEFAULT_CRITICAL_THRESHOLD: f64 = 75.0;
pub const DEFAULT_DATA_FILE: &str = "burnout_data.csv";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const WEBHOOK_ENV: &str = "SLACK_WEBHOOK_URL";
pub const AT_RISK_ENV: &str = "BURNOUT_AT_RISK_THRESHOLD";
pub const CRITICAL_ENV: &str = "BURNOUT_CRITICAL_THRESHOLD";
pub const DATA_FILE_ENV: &str = "BURNOUT_DATA_FILE";
pub const TIMEOUT_ENV: &str = "BURNOUT_WEBHOOK_TIMEOUT_SECS";

/// Webhook URL; the path carries the credential so it never shows up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct WebhookUrl(String);

impl WebhookUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for WebhookUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WebhookUrl([redacted])")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub at_risk: f64,
    pub critical: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            at_risk: DEFAULT_AT_RISK_THRESHOLD,
            critical: DEFAULT_CRITICAL_THRESHOLD,
        }
    }
}

impl Thresholds {
    /// Both bars must be positive and ordered. A positive at-risk bar keeps
    /// the company average above zero whenever a department qualifies.
    pub fn validate(&self) -> BurnoutResult<()> {
        for (name, value) in [("at-risk", self.at_risk), ("critical", self.critical)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(BurnoutError::Config(format!(
                    "{name} threshold must be a positive number, got {value}"
                )));
            }
        }
        if self.at_risk > self.critical {
            return Err(BurnoutError::Config(format!(
                "at-risk threshold {} exceeds critical threshold {}",
                self.at_risk, self.critical
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub webhook_url: Option<WebhookUrl>,
    pub thresholds: Thresholds,
    pub data_file: PathBuf,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            webhook_url: None,
            thresholds: Thresholds::default(),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> BurnoutResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, falling back to
    /// defaults for unset or blank keys.
    pub fn from_lookup<F>(lookup: F) -> BurnoutResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        let thresholds = Thresholds {
            at_risk: parse_or(get(AT_RISK_ENV), AT_RISK_ENV, defaults.thresholds.at_risk)?,
            critical: parse_or(
                get(CRITICAL_ENV),
                CRITICAL_ENV,
                defaults.thresholds.critical,
            )?,
        };
        thresholds.validate()?;

        let timeout_secs: u64 = parse_or(get(TIMEOUT_ENV), TIMEOUT_ENV, DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(BurnoutError::Config(format!(
                "{TIMEOUT_ENV} must be at least 1 second"
            )));
        }

        Ok(Self {
            webhook_url: get(WEBHOOK_ENV).map(WebhookUrl::new),
            thresholds,
            data_file: get(DATA_FILE_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_file),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn webhook(&self) -> BurnoutResult<&WebhookUrl> {
        self.webhook_url.as_ref().ok_or(BurnoutError::MissingWebhook)
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> BurnoutResult<T>
where
    T: std::str::FromStr,
{
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| BurnoutError::Config(format!("{key} has invalid value '{value}'"))),
    }
}
