//! Envelope for messages pushed to viewers over the real-time channel.
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::structs::{Segment, SpinEvent};

/// Event name for a full segment list push.
pub const EVENT_SEGMENTS_UPDATED: &str = "segments-updated";

/// Event name for a resolved spin.
pub const EVENT_SPIN: &str = "spin";

/// A message pushed from the server to viewer clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(tag = "event", content = "data")]
pub enum ServerMessage {
    /// The complete, current segment list.
    #[serde(rename = "segments-updated")]
    SegmentsUpdated(Vec<Segment>),
    /// A spin that viewers should animate.
    #[serde(rename = "spin")]
    Spin(SpinEvent),
}

impl ServerMessage {
    /// The event name carried in the `event` field.
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::SegmentsUpdated(_) => EVENT_SEGMENTS_UPDATED,
            Self::Spin(_) => EVENT_SPIN,
        }
    }
}
