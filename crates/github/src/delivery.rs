//! Authenticated webhook deliveries
//!
//! A request body is usually a single-read stream, but it is needed twice:
//! once for the signature and once for JSON decoding. [`WebhookDelivery`]
//! owns the buffered bytes after they have been authenticated and decodes
//! them on demand, so both steps see exactly the same bytes.

use std::fmt;
use std::io::Read;

use http::HeaderMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::headers::{extract_delivery_headers, DeliveryHeaders};
use crate::verify::{
    negotiate_signature, verify_reader, verify_signature_with, DigestAlgorithm, SignatureError,
};
use crate::webhooks::WebhookPayload;

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error("Webhook signature does not match the payload")]
    SignatureMismatch,

    #[error("Legacy {0} signatures are not accepted")]
    LegacySignatureRejected(DigestAlgorithm),

    #[error("Missing X-GitHub-Event header")]
    MissingEventType,

    #[error("Failed to decode {event_type} payload: {source}")]
    Decode {
        event_type: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Checks deliveries against the shared webhook secret
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: String,
    allow_legacy_sha1: bool,
}

impl fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("secret", &"[redacted]")
            .field("allow_legacy_sha1", &self.allow_legacy_sha1)
            .finish()
    }
}

impl WebhookVerifier {
    /// Accepts both `X-Hub-Signature-256` and `X-Hub-Signature`
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            allow_legacy_sha1: true,
        }
    }

    pub fn allow_legacy_sha1(mut self, allow: bool) -> Self {
        self.allow_legacy_sha1 = allow;
        self
    }

    /// Authenticate an already buffered body
    pub fn authenticate(
        &self,
        headers: &HeaderMap,
        body: impl Into<Vec<u8>>,
    ) -> Result<WebhookDelivery, DeliveryError> {
        let body = body.into();
        let (algorithm, signature) = self.select_signature(headers)?;
        let valid = verify_signature_with(algorithm, signature, &body, &self.secret)?;
        self.finish(headers, algorithm, valid, body)
    }

    /// Buffer a body stream once and authenticate it.
    ///
    /// The stream is read to the end with no size limit. Wrap `reader` in
    /// [`Read::take`] to bound memory use; a truncated body then fails as a
    /// signature mismatch.
    pub fn authenticate_reader<R: Read>(
        &self,
        headers: &HeaderMap,
        reader: R,
    ) -> Result<WebhookDelivery, DeliveryError> {
        let (algorithm, signature) = self.select_signature(headers)?;
        let verified = verify_reader(algorithm, signature, reader, &self.secret)?;
        self.finish(headers, algorithm, verified.valid, verified.body)
    }

    fn select_signature<'h>(
        &self,
        headers: &'h HeaderMap,
    ) -> Result<(DigestAlgorithm, &'h str), DeliveryError> {
        let (algorithm, signature) = negotiate_signature(headers).map_err(SignatureError::from)?;
        if algorithm == DigestAlgorithm::Sha1 && !self.allow_legacy_sha1 {
            return Err(DeliveryError::LegacySignatureRejected(algorithm));
        }
        Ok((algorithm, signature))
    }

    fn finish(
        &self,
        headers: &HeaderMap,
        algorithm: DigestAlgorithm,
        valid: bool,
        body: Vec<u8>,
    ) -> Result<WebhookDelivery, DeliveryError> {
        let DeliveryHeaders {
            delivery_id,
            event_type,
        } = extract_delivery_headers(headers);

        if !valid {
            warn!("Signature mismatch for delivery {:?}", delivery_id);
            return Err(DeliveryError::SignatureMismatch);
        }

        if event_type.is_empty() {
            return Err(DeliveryError::MissingEventType);
        }

        debug!(
            "Authenticated {} delivery {} ({}, {} bytes)",
            event_type,
            delivery_id,
            algorithm,
            body.len()
        );

        Ok(WebhookDelivery {
            delivery_id,
            event_type,
            algorithm,
            body,
        })
    }
}

/// A delivery whose body has been authenticated
#[derive(Debug, Clone)]
pub struct WebhookDelivery {
    pub delivery_id: String,
    pub event_type: String,
    /// Algorithm of the signature that was checked
    pub algorithm: DigestAlgorithm,
    body: Vec<u8>,
}

impl WebhookDelivery {
    /// Authenticate with `secret`, accepting either signature header
    pub fn authenticate(
        headers: &HeaderMap,
        body: impl Into<Vec<u8>>,
        secret: &str,
    ) -> Result<Self, DeliveryError> {
        WebhookVerifier::new(secret).authenticate(headers, body)
    }

    /// The exact bytes the signature was computed over
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    /// Decode the body into the schema matching the event type
    pub fn payload(&self) -> Result<WebhookPayload, DeliveryError> {
        WebhookPayload::parse(&self.event_type, &self.body).map_err(|source| {
            DeliveryError::Decode {
                event_type: self.event_type.clone(),
                source,
            }
        })
    }
}
