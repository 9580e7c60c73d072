//! Core state and logic for the Spinwheel event relay.
//!
//! - [`store`] -- the process-wide segment list, mirrored to a JSON file
//! - [`validate`] -- checks applied to administrative segment payloads
//! - [`resolver`] -- maps an optional product code to a segment index
//! - [`event_log`] -- fire-and-forget, append-only spin event log
//!
//! Nothing here knows about HTTP or `WebSocket`s; the gateway crate
//! wires these pieces to the outside world.

pub mod error;
pub mod event_log;
pub mod resolver;
pub mod store;
pub mod validate;

pub use error::{ResolveError, StoreError, ValidationError};
pub use event_log::EventLogger;
pub use resolver::{Resolution, ResolutionOutcome, resolve};
pub use store::{SegmentStore, default_segments};
pub use validate::{number_text, parse_segment_list, validate_segments};
