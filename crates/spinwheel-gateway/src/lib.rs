//! HTTP and `WebSocket` gateway for the Spinwheel event relay.
//!
//! This crate provides an Axum server that exposes:
//!
//! - **Webhook ingress** (`POST /webhook/tikfinity`) for the live-stream
//!   automation platform, optionally guarded by a shared secret
//! - **Admin REST endpoints** for reading and replacing prize segments
//! - **Test spin** (`POST /api/test-spin`) for local end-to-end checks
//! - **`WebSocket` endpoint** (`/ws`) pushing segment updates and spins
//!   to every connected viewer
//! - **Health check** (`GET /health`)
//!
//! # Architecture
//!
//! Handlers share one [`AppState`] holding the segment store, the event
//! logger, and a [`ClientHub`] that implements the [`BroadcastChannel`]
//! capability set. The hub is the only thing that knows about viewer
//! connections; the `WebSocket` module is one transport plugged into it.
//!
//! [`ClientHub`]: broadcast::ClientHub
//! [`BroadcastChannel`]: broadcast::BroadcastChannel

pub mod body;
pub mod broadcast;
pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use broadcast::{BroadcastChannel, ClientHub};
pub use config::{ConfigError, GatewayConfig};
pub use error::GatewayError;
pub use router::build_router;
pub use server::{ServerError, bind_listener, start_server};
pub use state::{AppState, SpinRequest};
