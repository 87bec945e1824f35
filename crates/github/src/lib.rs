//! GitHub webhook delivery handling
//!
//! Header extraction, HMAC signature verification and the payload schema for
//! the events this crate understands.

pub mod delivery;
pub mod events;
pub mod headers;
pub mod verify;
pub mod webhooks;


pub use delivery::{DeliveryError, WebhookDelivery, WebhookVerifier};
pub use events::*;
pub use headers::{extract_delivery_headers, DeliveryHeaders};
pub use verify::{
    compute_digest, compute_signature, negotiate_signature, verify_reader, verify_request,
    verify_signature, verify_signature_with, DigestAlgorithm, MalformedHeader, SignatureError,
    SignatureHeader, VerifiedBody,
};
pub use webhooks::WebhookPayload;
