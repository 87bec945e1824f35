//! Delivery metadata carried in request headers

use http::HeaderMap;

/// Unique identifier GitHub assigns to each delivery attempt
pub const DELIVERY_HEADER: &str = "x-github-delivery";
/// Event type label, e.g. `pull_request`
pub const EVENT_HEADER: &str = "x-github-event";
/// Legacy HMAC-SHA1 signature, `sha1=<hex>`
pub const SIGNATURE_HEADER: &str = "x-hub-signature";
/// HMAC-SHA256 signature, `sha256=<hex>`
pub const SIGNATURE_256_HEADER: &str = "x-hub-signature-256";

/// Identity of a single delivery
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryHeaders {
    pub delivery_id: String,
    pub event_type: String,
}

impl DeliveryHeaders {
    pub fn into_parts(self) -> (String, String) {
        (self.delivery_id, self.event_type)
    }
}

/// Read the delivery ID and event type from a request's headers.
///
/// Never fails: a header that is absent, or not valid text, comes back as an
/// empty string. Validating the values is up to the caller.
pub fn extract_delivery_headers(headers: &HeaderMap) -> DeliveryHeaders {
    DeliveryHeaders {
        delivery_id: header_or_empty(headers, DELIVERY_HEADER),
        event_type: header_or_empty(headers, EVENT_HEADER),
    }
}

fn header_or_empty(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderName, HeaderValue};

    #[test]
    fn test_extracts_both_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(
            DELIVERY_HEADER,
            HeaderValue::from_static("72d3162e-cc78-11e3-81ab-4c9367dc0958"),
        );
        headers.insert(EVENT_HEADER, HeaderValue::from_static("pull_request"));

        let (delivery_id, event_type) = extract_delivery_headers(&headers).into_parts();
        assert_eq!(delivery_id, "72d3162e-cc78-11e3-81ab-4c9367dc0958");
        assert_eq!(event_type, "pull_request");
    }

    #[test]
    fn test_header_names_are_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_bytes(b"X-GitHub-Event").unwrap(),
            HeaderValue::from_static("check_run"),
        );

        assert_eq!(extract_delivery_headers(&headers).event_type, "check_run");
    }

    #[test]
    fn test_missing_headers_are_empty() {
        let extracted = extract_delivery_headers(&HeaderMap::new());
        assert_eq!(extracted, DeliveryHeaders::default());

        let mut headers = HeaderMap::new();
        headers.insert(EVENT_HEADER, HeaderValue::from_static("installation"));
        let extracted = extract_delivery_headers(&headers);
        assert_eq!(extracted.delivery_id, "");
        assert_eq!(extracted.event_type, "installation");
    }

    #[test]
    fn test_non_text_header_is_empty() {
        let mut headers = HeaderMap::new();
        headers.insert(DELIVERY_HEADER, HeaderValue::from_bytes(&[0xfa, 0xfb]).unwrap());

        assert_eq!(extract_delivery_headers(&headers).delivery_id, "");
    }
}
