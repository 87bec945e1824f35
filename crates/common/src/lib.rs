//! Shared configuration and error types for the webhook receiver

pub mod config;
pub mod error;

pub use config::{Config, WebhookSecret};
pub use error::{Error, Result};
