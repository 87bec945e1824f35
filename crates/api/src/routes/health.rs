//! Health check routes

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    /// Signature headers this receiver accepts
    signatures: Vec<&'static str>,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let mut signatures = vec!["sha256"];
    if state.config.allow_legacy_sha1 {
        signatures.push("sha1");
    }

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        signatures,
    })
}
