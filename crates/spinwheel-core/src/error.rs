//! Error types for the core crate.

use std::path::PathBuf;

/// A segment replacement payload was malformed.
///
/// The `Display` text is safe to return to API clients verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The payload was not a non-empty list.
    #[error("Invalid segments data")]
    InvalidSegments,

    /// An element lacked a non-empty `id`, `text`, or `color`.
    #[error("Each segment must have id, text, and color")]
    MissingField {
        /// Position of the first offending element.
        index: usize,
    },
}

/// Errors raised by the [`SegmentStore`](crate::store::SegmentStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The replacement was rejected; in-memory state is unchanged.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Reading or writing the segment file failed.
    #[error("segment file {path}: {source}")]
    Io {
        /// File that was being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The segment file did not contain a JSON segment list.
    #[error("segment file {path} is not a segment list: {source}")]
    Serialization {
        /// File that was being parsed.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised by [`resolve`](crate::resolver::resolve).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// There are no segments to land on.
    #[error("cannot resolve a spin against an empty segment list")]
    NoSegments,
}
