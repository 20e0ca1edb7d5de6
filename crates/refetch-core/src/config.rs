use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::{Backoff, RetryPolicy};

/// Delay schedule name used in config.toml.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffMode {
    #[default]
    Fixed,
    Exponential,
}

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per call (including the first).
    pub max_attempts: u32,
    /// Delay between attempts in milliseconds.
    pub delay_ms: u64,
    /// Delay schedule: "fixed" (default) or "exponential".
    #[serde(default)]
    pub backoff: BackoffMode,
    /// Cap for exponential backoff in milliseconds; ignored for fixed.
    #[serde(default)]
    pub max_delay_ms: Option<u64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 1000,
            backoff: BackoffMode::Fixed,
            max_delay_ms: None,
        }
    }
}

impl RetryConfig {
    /// Convert to the policy passed into fetch calls.
    pub fn to_policy(&self) -> RetryPolicy {
        let backoff = match self.backoff {
            BackoffMode::Fixed => Backoff::Fixed,
            BackoffMode::Exponential => Backoff::Exponential {
                max_delay: Duration::from_millis(self.max_delay_ms.unwrap_or(30_000)),
            },
        };
        RetryPolicy {
            max_attempts: self.max_attempts,
            delay: Duration::from_millis(self.delay_ms),
            backoff,
        }
    }
}

/// Global configuration loaded from `~/.config/refetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefetchConfig {
    /// Connect timeout for each attempt, in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout for each attempt, in seconds.
    pub request_timeout_secs: u64,
    /// Optional User-Agent header override.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for RefetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            request_timeout_secs: 30,
            user_agent: None,
            retry: None,
        }
    }
}

impl RefetchConfig {
    /// Effective retry policy: the configured section or built-in defaults.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone().unwrap_or_default().to_policy()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("refetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from an explicit path. A missing file is an error.
pub fn load_from(path: &Path) -> Result<RefetchConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config file: {}", path.display()))?;
    let cfg = toml::from_str(&data)
        .with_context(|| format!("parse config file: {}", path.display()))?;
    Ok(cfg)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RefetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RefetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = RefetchConfig::default();
        assert_eq!(cfg.connect_timeout_secs, 15);
        assert_eq!(cfg.request_timeout_secs, 30);
        assert!(cfg.user_agent.is_none());
        assert!(cfg.retry.is_none());
    }

    #[test]
    fn default_retry_policy_is_three_fixed_one_second_attempts() {
        let policy = RefetchConfig::default().retry_policy();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay, Duration::from_millis(1000));
        assert_eq!(policy.backoff, Backoff::Fixed);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = RefetchConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: RefetchConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.connect_timeout_secs, cfg.connect_timeout_secs);
        assert_eq!(parsed.request_timeout_secs, cfg.request_timeout_secs);
    }

    #[test]
    fn config_toml_retry_section() {
        let toml = r#"
            connect_timeout_secs = 5
            request_timeout_secs = 10

            [retry]
            max_attempts = 5
            delay_ms = 250
        "#;
        let cfg: RefetchConfig = toml::from_str(toml).unwrap();
        let retry = cfg.retry.as_ref().unwrap();
        assert_eq!(retry.max_attempts, 5);
        assert_eq!(retry.delay_ms, 250);
        assert_eq!(retry.backoff, BackoffMode::Fixed);
        assert!(retry.max_delay_ms.is_none());
    }

    #[test]
    fn config_toml_exponential_backoff() {
        let toml = r#"
            connect_timeout_secs = 5
            request_timeout_secs = 10

            [retry]
            max_attempts = 6
            delay_ms = 100
            backoff = "exponential"
            max_delay_ms = 2000
        "#;
        let cfg: RefetchConfig = toml::from_str(toml).unwrap();
        let policy = cfg.retry_policy();
        assert_eq!(policy.max_attempts, 6);
        assert_eq!(
            policy.backoff,
            Backoff::Exponential {
                max_delay: Duration::from_millis(2000)
            }
        );
    }

    #[test]
    fn load_from_reads_a_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "connect_timeout_secs = 3\nrequest_timeout_secs = 7\nuser_agent = \"probe/1.0\"\n",
        )
        .unwrap();

        let cfg = load_from(&path).unwrap();
        assert_eq!(cfg.connect_timeout_secs, 3);
        assert_eq!(cfg.request_timeout_secs, 7);
        assert_eq!(cfg.user_agent.as_deref(), Some("probe/1.0"));
    }

    #[test]
    fn load_from_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_from(&dir.path().join("nope.toml")).is_err());
    }
}
