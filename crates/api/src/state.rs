//! Application state

use common::Config;
use github::WebhookVerifier;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub verifier: WebhookVerifier,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let verifier = WebhookVerifier::new(config.webhook_secret.expose())
            .allow_legacy_sha1(config.allow_legacy_sha1);
        Self { config, verifier }
    }
}
