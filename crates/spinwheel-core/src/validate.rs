//! Validation of administrative segment payloads.
//!
//! A replacement list must be a non-empty array whose every element has
//! non-empty string `id`, `text`, and `color` fields. Unknown fields are
//! dropped. Duplicate ids are allowed; lookups take the first match.

use serde_json::{Number, Value};
use spinwheel_types::Segment;

use crate::error::ValidationError;

/// Parse an untyped JSON payload into a validated segment list.
pub fn parse_segment_list(value: &Value) -> Result<Vec<Segment>, ValidationError> {
    let items = match value.as_array() {
        Some(items) if !items.is_empty() => items,
        _ => return Err(ValidationError::InvalidSegments),
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_segment(item).ok_or(ValidationError::MissingField { index }))
        .collect()
}

/// Check an already-typed segment list against the same rules as
/// [`parse_segment_list`].
pub fn validate_segments(segments: &[Segment]) -> Result<(), ValidationError> {
    if segments.is_empty() {
        return Err(ValidationError::InvalidSegments);
    }
    match segments.iter().position(|s| !is_complete(s)) {
        Some(index) => Err(ValidationError::MissingField { index }),
        None => Ok(()),
    }
}

fn parse_segment(item: &Value) -> Option<Segment> {
    let field = |name: &str| {
        item.get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    };
    Some(Segment {
        id: field("id")?,
        text: field("text")?,
        color: field("color")?,
    })
}

fn is_complete(segment: &Segment) -> bool {
    !segment.id.is_empty() && !segment.text.is_empty() && !segment.color.is_empty()
}

/// Build a segment from a stored list element without rejecting it.
///
/// Strings are taken as-is, numbers and booleans are rendered as text,
/// and anything else (including a missing field) becomes empty.
pub(crate) fn segment_from_loose(item: &Value) -> Segment {
    let field = |name: &str| match item.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => number_text(n),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    };
    Segment {
        id: field("id"),
        text: field("text"),
        color: field("color"),
    }
}

/// Render a JSON number the way a client-side `String(n)` would.
///
/// Integral values print without a fractional part, so `1.0` becomes
/// `"1"`. Everything else keeps `serde_json`'s formatting.
pub fn number_text(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}
