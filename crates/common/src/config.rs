//! Application configuration

use std::env;
use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// GitHub's documented upper bound for a webhook payload (25 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Shared HMAC key for webhook deliveries.
///
/// The value never shows up in `Debug` output, so a `Config` can be logged
/// safely.
#[derive(Clone, PartialEq, Eq)]
pub struct WebhookSecret(String);

impl WebhookSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Borrow the raw key for HMAC computation
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WebhookSecret([redacted])")
    }
}

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub webhook_secret: WebhookSecret,
    pub host: String,
    pub port: u16,
    /// Requests with a larger body are rejected before verification
    pub max_body_bytes: usize,
    /// Accept `X-Hub-Signature` (HMAC-SHA1) when no SHA-256 signature is sent
    pub allow_legacy_sha1: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let webhook_secret = match env::var("GITHUB_WEBHOOK_SECRET") {
            Ok(s) if !s.is_empty() => WebhookSecret::new(s),
            _ => {
                return Err(Error::Config(
                    "GITHUB_WEBHOOK_SECRET must be set".to_string(),
                ))
            }
        };

        let config = Self {
            webhook_secret,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT", 3000)?,
            max_body_bytes: parse_var("MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?,
            allow_legacy_sha1: parse_var("ALLOW_LEGACY_SHA1", true)?,
        };

        if config.allow_legacy_sha1 {
            warn!("Legacy X-Hub-Signature (HMAC-SHA1) deliveries are accepted");
        }
        debug!("Loaded config: {:?}", config);

        Ok(config)
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("{} has an invalid value: {:?}", name, raw))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = WebhookSecret::new("hunter2");
        let rendered = format!("{:?}", secret);
        assert!(!rendered.contains("hunter2"));
        assert_eq!(secret.expose(), "hunter2");
    }

    #[test]
    fn test_config_debug_hides_secret() {
        let config = Config {
            webhook_secret: WebhookSecret::new("s3cr3t"),
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            allow_legacy_sha1: false,
        };
        assert!(!format!("{:?}", config).contains("s3cr3t"));
    }

    #[test]
    fn test_parse_var_default_when_unset() {
        let port: u16 = parse_var("GHOOK_TEST_UNSET_VARIABLE", 4321).unwrap();
        assert_eq!(port, 4321);
    }
}
