//! Prize segments and the spin events resolved against them.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Segment
// ---------------------------------------------------------------------------

/// One prize slot on the wheel.
///
/// Segments form an ordered list; a segment's position in that list is
/// the `segmentIndex` viewers animate to. `id` is the product code
/// (SKU) that webhooks refer to and is matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Segment {
    /// Product code identifying the segment.
    pub id: String,
    /// Display label drawn on the wheel.
    pub text: String,
    /// Fill color token (e.g. `#eae56f`).
    pub color: String,
}

impl Segment {
    /// Build a segment from its three fields.
    pub fn new(id: impl Into<String>, text: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            color: color.into(),
        }
    }

    /// Whether `code` names this segment, ignoring case.
    pub fn matches_code(&self, code: &str) -> bool {
        self.id.to_uppercase() == code.to_uppercase()
    }
}

// ---------------------------------------------------------------------------
// SpinEvent
// ---------------------------------------------------------------------------

/// Discriminator carried in the `type` field of every [`SpinEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "lowercase")]
pub enum SpinEventType {
    /// A resolved spin.
    Spin,
}

/// The result of resolving one webhook or test request to a segment.
///
/// Created once, then broadcast to viewers and appended to the event
/// log. Never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct SpinEvent {
    /// Always [`SpinEventType::Spin`].
    #[serde(rename = "type")]
    pub event_type: SpinEventType,
    /// Viewer who triggered the spin.
    pub username: String,
    /// Free text forwarded from the automation platform.
    pub text: String,
    /// Product code from the request, if one was given.
    pub sku: Option<String>,
    /// Position of the winning segment in the segment list.
    #[ts(type = "number")]
    pub segment_index: usize,
    /// Copy of the winning segment at resolution time.
    pub segment: Segment,
    /// ISO-8601 UTC timestamp with millisecond precision.
    pub timestamp: String,
}

impl SpinEvent {
    /// Build a spin event stamped with the current time.
    pub fn new(
        username: String,
        text: String,
        sku: Option<String>,
        segment_index: usize,
        segment: Segment,
    ) -> Self {
        Self::at(username, text, sku, segment_index, segment, Utc::now())
    }

    /// Build a spin event stamped with `at`.
    pub fn at(
        username: String,
        text: String,
        sku: Option<String>,
        segment_index: usize,
        segment: Segment,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            event_type: SpinEventType::Spin,
            username,
            text,
            sku,
            segment_index,
            segment,
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}
