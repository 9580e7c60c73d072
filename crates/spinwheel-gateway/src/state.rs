//! Shared application state for the gateway.
//!
//! [`AppState`] owns the segment store, the viewer hub and the event
//! logger, and implements the two operations every mutating endpoint
//! funnels through: [`AppState::spin`] and [`AppState::replace_segments`].

use std::sync::Arc;

use spinwheel_core::{EventLogger, ResolutionOutcome, SegmentStore, resolve};
use spinwheel_types::{ConnectionId, Segment, ServerMessage, SpinEvent};
use tracing::{debug, info, warn};

use crate::broadcast::{BroadcastChannel, ClientHub};
use crate::config::GatewayConfig;
use crate::error::GatewayError;

/// Inputs for one spin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinRequest {
    /// Viewer who triggered the spin.
    pub username: String,
    /// Free text to forward to viewers.
    pub text: String,
    /// Product code to land on, if any.
    pub sku: Option<String>,
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
pub struct AppState {
    /// Gateway configuration (CORS origins, webhook secret, paths).
    pub config: GatewayConfig,
    /// The live segment list.
    pub store: Arc<SegmentStore>,
    /// Registry of connected viewers.
    pub hub: Arc<ClientHub>,
    /// Append-only spin log.
    pub event_log: EventLogger,
}

impl AppState {
    /// Wire the store, hub and logger together.
    ///
    /// Registers the hub handlers that push the current segments to each
    /// newly connected viewer (and only to that viewer).
    pub fn new(config: GatewayConfig, store: Arc<SegmentStore>, event_log: EventLogger) -> Self {
        let hub = Arc::new(ClientHub::new());

        let segments = Arc::clone(&store);
        hub.on_connect(Box::new(move |id: ConnectionId, channel: &dyn BroadcastChannel| {
            let message = ServerMessage::SegmentsUpdated(segments.current().to_vec());
            if let Err(e) = channel.send_to(id, &message) {
                warn!(conn_id = %id, error = %e, "Failed to send initial segments");
            }
        }));
        hub.on_disconnect(Box::new(|id: ConnectionId| {
            debug!(conn_id = %id, "Viewer left");
        }));

        Self {
            config,
            store,
            hub,
            event_log,
        }
    }

    /// Resolve a spin, broadcast it to every viewer and append it to the
    /// event log.
    ///
    /// The log write is queued, not awaited: the returned event does not
    /// depend on it succeeding.
    pub fn spin(&self, request: SpinRequest) -> Result<SpinEvent, GatewayError> {
        let segments = self.store.current();
        let resolution = resolve(request.sku.as_deref(), &segments, &mut rand::rng())
            .map_err(|e| GatewayError::Internal(e.to_string()))?;

        match resolution.outcome {
            ResolutionOutcome::Matched => {
                info!(sku = ?request.sku, index = resolution.index, "SKU found");
            }
            ResolutionOutcome::Fallback => {
                info!(sku = ?request.sku, index = resolution.index, "SKU not found, picked a random segment");
            }
        }

        let segment = segments
            .get(resolution.index)
            .cloned()
            .ok_or_else(|| GatewayError::Internal(format!("index {} out of range", resolution.index)))?;

        let event = SpinEvent::new(
            request.username,
            request.text,
            request.sku,
            resolution.index,
            segment,
        );

        let receivers = self.hub.broadcast_all(&ServerMessage::Spin(event.clone()));
        info!(
            username = %event.username,
            segment = %event.segment.id,
            receivers,
            "Spin event emitted to clients"
        );

        self.event_log.append(&event);
        Ok(event)
    }

    /// Replace the segment list, persist it and push it to every viewer.
    ///
    /// Nothing is broadcast when validation or persistence fails.
    pub fn replace_segments(&self, segments: Vec<Segment>) -> Result<Arc<[Segment]>, GatewayError> {
        let next = self.store.replace(segments)?;
        let receivers = self
            .hub
            .broadcast_all(&ServerMessage::SegmentsUpdated(next.to_vec()));
        info!(count = next.len(), receivers, "Segments updated and broadcast");
        Ok(next)
    }

    /// The configured webhook secret, if any.
    pub fn webhook_secret(&self) -> Option<&str> {
        self.config.webhook_secret.as_deref()
    }
}
