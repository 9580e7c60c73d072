//! Shared type definitions for the Spinwheel event relay.
//!
//! Types defined here are serialized over the HTTP API and the viewer
//! `WebSocket`, and flow downstream to `TypeScript` via `ts-rs` for the
//! wheel frontend.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for viewer connections
//! - [`structs`] -- Prize segments and spin events
//! - [`messages`] -- Envelope pushed to connected viewers

pub mod ids;
pub mod messages;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use ids::ConnectionId;
pub use messages::{EVENT_SEGMENTS_UPDATED, EVENT_SPIN, ServerMessage};
pub use structs::{Segment, SpinEvent, SpinEventType};
