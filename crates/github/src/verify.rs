//! Webhook signature verification
//!
//! GitHub signs every delivery with an HMAC of the raw request body, keyed
//! with the webhook secret. The legacy `X-Hub-Signature` header carries an
//! HMAC-SHA1 (`sha1=<hex>`), the `X-Hub-Signature-256` header an HMAC-SHA256
//! (`sha256=<hex>`).
//!
//! The digest must be computed over the exact bytes received. Decoding and
//! re-encoding the JSON first will change the bytes and break the signature.

use std::fmt;
use std::io::Read;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use http::HeaderMap;
use sha1::Sha1;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::debug;

use crate::headers::{SIGNATURE_256_HEADER, SIGNATURE_HEADER};

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

/// Digest algorithm used for the HMAC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    /// HMAC-SHA1, sent in `X-Hub-Signature`
    Sha1,
    /// HMAC-SHA256, sent in `X-Hub-Signature-256`
    Sha256,
}

impl DigestAlgorithm {
    /// Token that prefixes the hex digest in the header value
    pub fn token(self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => "sha1",
            DigestAlgorithm::Sha256 => "sha256",
        }
    }

    /// Header GitHub uses for this algorithm
    pub fn header_name(self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => SIGNATURE_HEADER,
            DigestAlgorithm::Sha256 => SIGNATURE_256_HEADER,
        }
    }

    /// Length of the hex-encoded digest
    pub fn hex_len(self) -> usize {
        match self {
            DigestAlgorithm::Sha1 => 40,
            DigestAlgorithm::Sha256 => 64,
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = MalformedHeader;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha1" => Ok(DigestAlgorithm::Sha1),
            "sha256" => Ok(DigestAlgorithm::Sha256),
            other => Err(MalformedHeader::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Why a signature header could not be used
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedHeader {
    #[error("signature header is missing")]
    Missing,

    #[error("signature header has no '=' separator")]
    MissingSeparator,

    #[error("expected a {expected} signature, got {found:?}")]
    UnexpectedAlgorithm {
        expected: DigestAlgorithm,
        found: String,
    },

    #[error("unknown signature algorithm {0:?}")]
    UnknownAlgorithm(String),
}

#[derive(Error, Debug)]
pub enum SignatureError {
    #[error("Malformed signature header: {0}")]
    MalformedHeader(#[from] MalformedHeader),

    #[error("Failed to read request body: {0}")]
    BodyRead(#[from] std::io::Error),

    #[error("Failed to compute digest: {0}")]
    DigestCompute(String),
}

impl SignatureError {
    pub fn is_malformed_header(&self) -> bool {
        matches!(self, SignatureError::MalformedHeader(_))
    }
}

/// A parsed `<algorithm>=<hex digest>` header value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureHeader<'a> {
    pub algorithm: DigestAlgorithm,
    pub digest: &'a str,
}

impl<'a> SignatureHeader<'a> {
    /// Parse a header value, requiring it to use `expected`.
    ///
    /// Only the first `=` separates the token from the digest.
    pub fn parse(value: &'a str, expected: DigestAlgorithm) -> Result<Self, MalformedHeader> {
        let (token, digest) = value
            .split_once('=')
            .ok_or(MalformedHeader::MissingSeparator)?;

        if token != expected.token() {
            return Err(MalformedHeader::UnexpectedAlgorithm {
                expected,
                found: token.to_string(),
            });
        }

        Ok(Self {
            algorithm: expected,
            digest,
        })
    }
}

/// Body bytes read from a stream, together with the verdict over them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedBody {
    pub valid: bool,
    pub body: Vec<u8>,
}

/// Compute the hex HMAC digest of `body`
pub fn compute_digest(
    algorithm: DigestAlgorithm,
    body: &[u8],
    secret: &str,
) -> Result<String, SignatureError> {
    let digest = match algorithm {
        DigestAlgorithm::Sha1 => {
            let mut mac = HmacSha1::new_from_slice(secret.as_bytes())
                .map_err(|e| SignatureError::DigestCompute(e.to_string()))?;
            mac.update(body);
            hex::encode(mac.finalize().into_bytes())
        }
        DigestAlgorithm::Sha256 => {
            let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
                .map_err(|e| SignatureError::DigestCompute(e.to_string()))?;
            mac.update(body);
            hex::encode(mac.finalize().into_bytes())
        }
    };
    Ok(digest)
}

/// Compute the header value GitHub would send for `body`, e.g. `sha1=<hex>`
pub fn compute_signature(
    algorithm: DigestAlgorithm,
    body: &[u8],
    secret: &str,
) -> Result<String, SignatureError> {
    Ok(format!(
        "{}={}",
        algorithm.token(),
        compute_digest(algorithm, body, secret)?
    ))
}

/// Verify an `X-Hub-Signature` (HMAC-SHA1) header value
///
/// `signature` is the value of the `X-Hub-Signature` header
/// `body` is the raw request body
/// `secret` is your webhook secret
pub fn verify_signature(signature: &str, body: &[u8], secret: &str) -> Result<bool, SignatureError> {
    verify_signature_with(DigestAlgorithm::Sha1, signature, body, secret)
}

/// Verify a signature header value produced with `algorithm`.
///
/// Returns `Ok(false)` when the header is well formed but the digest does not
/// match, and an error when the header cannot be interpreted at all.
///
/// The digest must equal the lowercase hex GitHub sends byte for byte; an
/// uppercase digest is a mismatch.
pub fn verify_signature_with(
    algorithm: DigestAlgorithm,
    signature: &str,
    body: &[u8],
    secret: &str,
) -> Result<bool, SignatureError> {
    let header = SignatureHeader::parse(signature, algorithm)?;
    let expected = compute_digest(algorithm, body, secret)?;

    let provided = header.digest;

    if provided.len() != expected.len() {
        debug!(
            "Signature digest has length {}, expected {}",
            provided.len(),
            expected.len()
        );
        return Ok(false);
    }

    Ok(provided.as_bytes().ct_eq(expected.as_bytes()).into())
}

/// Read a body stream to the end once and verify it.
///
/// The buffered bytes are handed back so the caller can still decode them.
/// Wrap `reader` in [`Read::take`] to bound memory use.
pub fn verify_reader<R: Read>(
    algorithm: DigestAlgorithm,
    signature: &str,
    mut reader: R,
    secret: &str,
) -> Result<VerifiedBody, SignatureError> {
    let mut body = Vec::new();
    reader.read_to_end(&mut body)?;

    let valid = verify_signature_with(algorithm, signature, &body, secret)?;
    Ok(VerifiedBody { valid, body })
}

/// Pick the strongest signature header present on a request
pub fn negotiate_signature(headers: &HeaderMap) -> Result<(DigestAlgorithm, &str), MalformedHeader> {
    for algorithm in [DigestAlgorithm::Sha256, DigestAlgorithm::Sha1] {
        if let Some(value) = headers.get(algorithm.header_name()) {
            // A header that is not visible ASCII can't hold a hex digest
            let value = value.to_str().map_err(|_| MalformedHeader::MissingSeparator)?;
            return Ok((algorithm, value));
        }
    }
    Err(MalformedHeader::Missing)
}

/// Verify a request using whichever signature header it carries.
///
/// `X-Hub-Signature-256` is preferred over `X-Hub-Signature` when both are
/// present.
pub fn verify_request(headers: &HeaderMap, body: &[u8], secret: &str) -> Result<bool, SignatureError> {
    let (algorithm, signature) = negotiate_signature(headers)?;
    verify_signature_with(algorithm, signature, body, secret)
}
