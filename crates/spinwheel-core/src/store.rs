//! Process-wide segment list, mirrored to a JSON file.
//!
//! The in-memory list is the source of truth. The file is a passive
//! mirror rewritten after every successful [`SegmentStore::replace`],
//! and read once at startup by [`SegmentStore::open`].
//!
//! Disk I/O here is synchronous. Loading happens once before the server
//! starts and replacement is a rare administrative action, so neither
//! sits on a hot path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;
use spinwheel_types::Segment;
use tracing::{info, warn};

use crate::error::StoreError;
use crate::validate::{segment_from_loose, validate_segments};

/// The six segments written when no segment file exists yet.
pub fn default_segments() -> Vec<Segment> {
    vec![
        Segment::new("SKU_A", "Premio A", "#eae56f"),
        Segment::new("SKU_B", "Premio B", "#89f26e"),
        Segment::new("SKU_C", "Premio C", "#7de6ef"),
        Segment::new("SKU_D", "Premio D", "#e7706f"),
        Segment::new("SKU_E", "Premio E", "#a17cf3"),
        Segment::new("SKU_F", "Premio F", "#f49e4c"),
    ]
}

/// Ordered list of prize segments shared by every request handler.
///
/// Readers get a cheap [`Arc`] snapshot. Replacements take the write
/// lock for the swap and the file write, so concurrent replacements are
/// serialized and the file always reflects the last one to finish.
#[derive(Debug)]
pub struct SegmentStore {
    path: PathBuf,
    segments: RwLock<Arc<[Segment]>>,
}

impl SegmentStore {
    /// Open the store backed by `path`.
    ///
    /// Creates the parent directory when missing. If the file does not
    /// exist, the [`default_segments`] are written to it and used;
    /// otherwise its content is used as-is.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| StoreError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let segments = Self::load(&path)?;
        info!(path = %path.display(), count = segments.len(), "Segments loaded");

        Ok(Self {
            path,
            segments: RwLock::new(segments.into()),
        })
    }

    /// Read the segment list from `path`, seeding it with the defaults
    /// when the file is absent.
    ///
    /// No schema checks beyond JSON shape are applied to an existing
    /// file: whatever an operator put there is served. Missing fields
    /// load as empty strings and numeric fields are rendered as text.
    pub fn load(path: &Path) -> Result<Vec<Segment>, StoreError> {
        match fs::read_to_string(path) {
            Ok(raw) => {
                let items: Vec<Value> =
                    serde_json::from_str(&raw).map_err(|source| StoreError::Serialization {
                        path: path.to_path_buf(),
                        source,
                    })?;
                Ok(items.iter().map(segment_from_loose).collect())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let defaults = default_segments();
                write_segments(path, &defaults)?;
                info!(path = %path.display(), "No segment file found, wrote defaults");
                Ok(defaults)
            }
            Err(source) => Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Snapshot of the live segment list.
    pub fn current(&self) -> Arc<[Segment]> {
        Arc::clone(&*self.segments.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Number of live segments.
    pub fn len(&self) -> usize {
        self.segments
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the live list is empty. Never true after a successful
    /// [`open`](Self::open) unless the file on disk held `[]`.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// File backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the whole segment list and persist it.
    ///
    /// Invalid input is rejected with [`StoreError::Validation`] and
    /// leaves the store untouched. A write failure is reported as
    /// [`StoreError::Io`] *after* the in-memory swap; memory is not
    /// rolled back, so memory and disk disagree until the next
    /// successful replacement or a restart.
    pub fn replace(&self, segments: Vec<Segment>) -> Result<Arc<[Segment]>, StoreError> {
        validate_segments(&segments)?;

        let next: Arc<[Segment]> = segments.into();
        let mut guard = self.segments.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::clone(&next);

        if let Err(e) = write_segments(&self.path, &next) {
            warn!(path = %self.path.display(), error = %e, "Segments swapped in memory but not persisted");
            return Err(e);
        }

        info!(count = next.len(), "Segments replaced");
        Ok(next)
    }
}

fn write_segments(path: &Path, segments: &[Segment]) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(segments).map_err(|source| {
        StoreError::Serialization {
            path: path.to_path_buf(),
            source,
        }
    })?;
    fs::write(path, json).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}
