//! REST endpoint handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/segments` | Current segment list |
//! | `POST` | `/api/segments` | Replace the segment list (admin) |
//! | `POST` | `/webhook/tikfinity` | Spin triggered by the automation platform |
//! | `POST` | `/api/test-spin` | Spin for local testing, no secret check |
//! | `GET` | `/health` | Liveness and segment count |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use serde_json::{Value, json};
use spinwheel_core::parse_segment_list;
use tracing::{info, warn};

use crate::body::LooseBody;
use crate::error::GatewayError;
use crate::state::{AppState, SpinRequest};

/// Header carrying the webhook shared secret.
pub const TOKEN_HEADER: &str = "x-tikfinity-token";

/// Username used when the webhook payload names nobody.
pub const ANONYMOUS_USERNAME: &str = "Anónimo";

/// Username stamped on test spins.
pub const TEST_USERNAME: &str = "Test User";

/// Text stamped on test spins.
pub const TEST_TEXT: &str = "Test spin";

// ---------------------------------------------------------------------------
// GET /api/segments
// ---------------------------------------------------------------------------

/// Return the live segment list.
pub async fn get_segments(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let segments = state.store.current();
    Json(json!({ "segments": &*segments }))
}

// ---------------------------------------------------------------------------
// POST /api/segments
// ---------------------------------------------------------------------------

/// Replace the segment list and push it to every viewer.
///
/// Body: `{ "segments": [ { "id", "text", "color" }, ... ] }`.
pub async fn update_segments(
    State(state): State<Arc<AppState>>,
    body: LooseBody,
) -> Result<impl IntoResponse, GatewayError> {
    let raw = body.get("segments").unwrap_or(&Value::Null);
    let segments = parse_segment_list(raw)?;
    let segments = state.replace_segments(segments)?;

    Ok(Json(json!({
        "success": true,
        "segments": &*segments,
    })))
}

// ---------------------------------------------------------------------------
// POST /webhook/tikfinity
// ---------------------------------------------------------------------------

/// Spin triggered by the live-stream automation platform.
///
/// Field names follow generic automation tools: `value1`/`username`,
/// `value2`/`text`, `value3`/`sku`. When a secret is configured the
/// request must carry it in the `x-tikfinity-token` header or in a
/// `secret` body field.
pub async fn tikfinity_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: LooseBody,
) -> Result<impl IntoResponse, GatewayError> {
    info!(fields = ?body.0.keys().collect::<Vec<_>>(), "Webhook received");

    if let Some(secret) = state.webhook_secret() {
        let token = headers
            .get(TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
            .or_else(|| body.first_present(&["secret"]));
        if token.as_deref() != Some(secret) {
            warn!("Webhook rejected: invalid token");
            return Err(GatewayError::Unauthorized);
        }
    }

    let request = SpinRequest {
        username: body
            .first_present(&["value1", "username"])
            .unwrap_or_else(|| ANONYMOUS_USERNAME.to_owned()),
        text: body.first_present(&["value2", "text"]).unwrap_or_default(),
        sku: body.first_present(&["value3", "sku"]),
    };
    info!(username = %request.username, sku = ?request.sku, "Webhook spin requested");

    let event = state.spin(request)?;

    Ok(Json(json!({
        "success": true,
        "event": event,
        "message": "Spin event emitted successfully",
    })))
}

// ---------------------------------------------------------------------------
// POST /api/test-spin
// ---------------------------------------------------------------------------

/// Spin for local testing. Same resolution and broadcast as the webhook,
/// fixed username, no secret check.
pub async fn test_spin(
    State(state): State<Arc<AppState>>,
    body: LooseBody,
) -> Result<impl IntoResponse, GatewayError> {
    let event = state.spin(SpinRequest {
        username: TEST_USERNAME.to_owned(),
        text: TEST_TEXT.to_owned(),
        sku: body.first_present(&["sku"]),
    })?;

    Ok(Json(json!({
        "success": true,
        "event": event,
    })))
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

/// Liveness probe.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "segments": state.store.len(),
    }))
}
