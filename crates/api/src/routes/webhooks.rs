//! Webhook routes

use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::ApiResult;
use crate::state::AppState;
use github::WebhookPayload;

#[derive(Serialize)]
pub struct WebhookResponse {
    ok: bool,
    delivery_id: String,
    event: String,
}

pub async fn github(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<WebhookResponse>> {
    let delivery = state.verifier.authenticate(&headers, body.to_vec())?;
    let payload = delivery.payload()?;

    log_payload(&delivery.delivery_id, &payload);

    Ok(Json(WebhookResponse {
        ok: true,
        delivery_id: delivery.delivery_id,
        event: delivery.event_type,
    }))
}

fn log_payload(delivery_id: &str, payload: &WebhookPayload) {
    match payload {
        WebhookPayload::Ping(event) => {
            info!("[{}] ping: {}", delivery_id, event.zen);
        }
        WebhookPayload::Installation(event) => {
            info!(
                "[{}] installation {} {:?} on {}",
                delivery_id, event.installation.id, event.action, event.installation.account.login
            );
        }
        WebhookPayload::CheckRun(event) => {
            info!(
                "[{}] check run {:?} {} in {}: {:?}/{:?}",
                delivery_id,
                event.action,
                event.check_run.name,
                event.repository.full_name,
                event.check_run.status,
                event.check_run.conclusion
            );
        }
        WebhookPayload::PullRequest(event) => {
            info!(
                "[{}] PR #{} in {} {:?} by {}",
                delivery_id,
                event.number,
                event.repository.full_name,
                event.action,
                event.sender.login
            );
        }
        WebhookPayload::Other { event_type, event } => {
            debug!(
                "[{}] {} event (action: {:?})",
                delivery_id, event_type, event.action
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use common::{Config, WebhookSecret};
    use github::{compute_signature, DigestAlgorithm};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::{build_router, state::AppState};

    const SECRET: &str = "s3cr3t";
    const PING: &str = r#"{"zen":"Keep it logically awesome.","hook_id":7}"#;

    fn app(allow_legacy_sha1: bool, max_body_bytes: usize) -> Router {
        let config = Config {
            webhook_secret: WebhookSecret::new(SECRET),
            host: "127.0.0.1".to_string(),
            port: 0,
            max_body_bytes,
            allow_legacy_sha1,
        };
        build_router(Arc::new(AppState::new(config)))
    }

    fn delivery(event: &str, signature: Option<(&str, String)>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/webhooks/github")
            .header("content-type", "application/json")
            .header("X-GitHub-Delivery", "72d3162e-cc78-11e3-81ab-4c9367dc0958")
            .header("X-GitHub-Event", event);
        if let Some((name, value)) = signature {
            builder = builder.header(name, value);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn sign(algorithm: DigestAlgorithm, body: &str) -> Option<(&'static str, String)> {
        Some((
            algorithm.header_name(),
            compute_signature(algorithm, body.as_bytes(), SECRET).unwrap(),
        ))
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_accepts_signed_ping() {
        let response = app(true, 1024)
            .oneshot(delivery("ping", sign(DigestAlgorithm::Sha256, PING), PING))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["event"], "ping");
        assert_eq!(body["delivery_id"], "72d3162e-cc78-11e3-81ab-4c9367dc0958");
    }

    #[tokio::test]
    async fn test_accepts_legacy_sha1() {
        let response = app(true, 1024)
            .oneshot(delivery("ping", sign(DigestAlgorithm::Sha1, PING), PING))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rejects_legacy_sha1_when_disabled() {
        let response = app(false, 1024)
            .oneshot(delivery("ping", sign(DigestAlgorithm::Sha1, PING), PING))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rejects_bad_signature() {
        let signature = compute_signature(DigestAlgorithm::Sha256, b"something else", SECRET).unwrap();
        let response = app(true, 1024)
            .oneshot(delivery(
                "ping",
                Some(("X-Hub-Signature-256", signature)),
                PING,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["code"], "invalid_signature");
    }

    #[tokio::test]
    async fn test_rejects_missing_or_malformed_signature() {
        let response = app(true, 1024)
            .oneshot(delivery("ping", None, PING))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app(true, 1024)
            .oneshot(delivery(
                "ping",
                Some(("X-Hub-Signature", "deadbeef".to_string())),
                PING,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rejects_undecodable_payload() {
        let body = r#"{"action":"opened"}"#;
        let response = app(true, 1024)
            .oneshot(delivery(
                "pull_request",
                sign(DigestAlgorithm::Sha256, body),
                body,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rejects_oversized_body() {
        let body = format!(r#"{{"zen":"{}"}}"#, "a".repeat(2048));
        let response = app(true, 1024)
            .oneshot(delivery("ping", sign(DigestAlgorithm::Sha256, &body), &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(false, 1024)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["signatures"], serde_json::json!(["sha256"]));
    }
}
