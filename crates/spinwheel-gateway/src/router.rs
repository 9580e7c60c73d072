//! Axum router construction.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with the viewer CORS policy and request tracing.

use std::sync::Arc;

use axum::Router;
use axum::http::request::Parts;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /api/segments` -- current segment list
/// - `POST /api/segments` -- replace the segment list
/// - `POST /webhook/tikfinity` -- webhook ingress
/// - `POST /api/test-spin` -- local test spin
/// - `GET /health` -- health check
/// - `GET /ws` -- viewer `WebSocket`
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.client_origins);

    Router::new()
        // REST API
        .route(
            "/api/segments",
            get(handlers::get_segments).post(handlers::update_segments),
        )
        .route("/api/test-spin", axum::routing::post(handlers::test_spin))
        // Webhook ingress
        .route(
            "/webhook/tikfinity",
            axum::routing::post(handlers::tikfinity_webhook),
        )
        .route("/health", get(handlers::health))
        // WebSocket
        .route("/ws", get(ws::ws_viewer))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the viewer frontend.
///
/// Allows the configured origins plus any `localhost` origin, with
/// credentials. Requests without an `Origin` header (curl, automation
/// platforms) are unaffected by CORS.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Arc<[String]> = origins.into();

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin
                    .to_str()
                    .is_ok_and(|o| origin_allowed(o, &allowed))
            },
        ))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Whether a browser origin may call the API.
pub fn origin_allowed(origin: &str, allowed: &[String]) -> bool {
    origin.contains("localhost") || allowed.iter().any(|a| a == origin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_rules() {
        let allowed = vec!["https://wheel.example".to_owned()];
        assert!(origin_allowed("https://wheel.example", &allowed));
        assert!(origin_allowed("http://localhost:5173", &allowed));
        assert!(!origin_allowed("https://evil.example", &allowed));
        assert!(!origin_allowed("https://wheel.example.evil", &allowed));
    }
}
