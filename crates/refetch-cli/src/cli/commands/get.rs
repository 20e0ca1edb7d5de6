//! `refetch get` – one resilient fetch, decoded as JSON and printed.

use anyhow::{bail, Context, Result};
use refetch_core::config::RefetchConfig;
use refetch_core::control::FetchControl;
use refetch_core::fetch::{FetchOutcome, Fetcher};
use refetch_core::retry::RetryPolicy;
use refetch_core::transport::HttpTransport;
use std::time::Duration;
use url::Url;

pub async fn run_get(
    cfg: &RefetchConfig,
    url: &str,
    max_attempts: Option<u32>,
    delay_ms: Option<u64>,
    deadline_secs: Option<u64>,
    pretty: bool,
) -> Result<()> {
    // Early shape check so a typo fails with a parse error rather than a
    // transport error on attempt 1.
    let url = validate_url(url)?;
    let policy = effective_policy(cfg, max_attempts, delay_ms);

    let mut builder = HttpTransport::builder()
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .request_timeout(Duration::from_secs(cfg.request_timeout_secs));
    if let Some(ua) = &cfg.user_agent {
        builder = builder.user_agent(ua.clone());
    }
    let transport = builder.build().context("build HTTP transport")?;

    let mut control = FetchControl::new();
    if let Some(secs) = deadline_secs {
        control = control.with_deadline(Duration::from_secs(secs));
    }

    // Ctrl-C cancels the in-flight fetch instead of killing the process.
    let token = control.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, cancelling fetch");
            token.cancel();
        }
    });

    let fetcher = Fetcher::new(transport);
    let outcome = fetcher
        .fetch_with_control::<serde_json::Value>(url.as_str(), &policy, &control)
        .await;

    match outcome {
        FetchOutcome::Success { value, attempts } => {
            tracing::info!(attempts, "fetch succeeded");
            let rendered = if pretty {
                serde_json::to_string_pretty(&value)?
            } else {
                value.to_string()
            };
            println!("{}", rendered);
            Ok(())
        }
        FetchOutcome::Failure { error, attempts } => {
            bail!("fetch failed after {} attempt(s): {}", attempts, error)
        }
        FetchOutcome::Cancelled { attempts } => {
            bail!("fetch cancelled after {} attempt(s)", attempts)
        }
    }
}

/// Parse and scheme-check the URL argument.
fn validate_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("invalid URL: {}", raw))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("unsupported URL scheme: {}", url.scheme());
    }
    Ok(url)
}

/// Config-file policy with CLI flag overrides applied on top.
fn effective_policy(
    cfg: &RefetchConfig,
    max_attempts: Option<u32>,
    delay_ms: Option<u64>,
) -> RetryPolicy {
    let mut policy = cfg.retry_policy();
    if let Some(n) = max_attempts {
        policy.max_attempts = n;
    }
    if let Some(ms) = delay_ms {
        policy.delay = Duration::from_millis(ms);
    }
    policy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config_policy() {
        let cfg = RefetchConfig::default();
        let policy = effective_policy(&cfg, Some(7), Some(50));
        assert_eq!(policy.max_attempts, 7);
        assert_eq!(policy.delay, Duration::from_millis(50));
    }

    #[test]
    fn config_defaults_used_without_flags() {
        let cfg = RefetchConfig::default();
        let policy = effective_policy(&cfg, None, None);
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay, Duration::from_millis(1000));
    }

    #[test]
    fn http_and_https_urls_accepted() {
        assert!(validate_url("http://example.com/a").is_ok());
        assert!(validate_url("https://example.com/a").is_ok());
    }

    #[test]
    fn other_schemes_rejected() {
        assert!(validate_url("ftp://example.com/a").is_err());
        assert!(validate_url("not a url").is_err());
    }
}
