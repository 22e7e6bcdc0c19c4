//! The history cache: last ten generations, newest first.
//!
//! Structure:
//! - Pure functions: bounding rule, default path
//! - Effect functions: load/save of the single JSON slot

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::types::GeneratedImageRecord;

/// Maximum number of records kept.
pub const HISTORY_LIMIT: usize = 10;

/// History filename within the data directory.
const HISTORY_FILENAME: &str = "history.json";

// ============================================================================
// PURE FUNCTIONS (Computations)
// ============================================================================

/// Returns the default history file location.
///
/// On Linux: ~/.local/share/wallcraft/history.json
pub fn default_history_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wallcraft")
        .join(HISTORY_FILENAME)
}

/// Prepend a record and drop everything past `limit`.
pub fn push_bounded(
    entries: &mut Vec<GeneratedImageRecord>,
    record: GeneratedImageRecord,
    limit: usize,
) {
    entries.insert(0, record);
    entries.truncate(limit);
}

// ============================================================================
// CACHE
// ============================================================================

/// In-memory history backed by one JSON file.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryCache {
    path: PathBuf,
    entries: Vec<GeneratedImageRecord>,
}

impl HistoryCache {
    /// Load the persisted list.
    ///
    /// A missing or unparsable file yields an empty list. Never fails.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match read_entries(&path) {
            Ok(mut entries) => {
                entries.truncate(HISTORY_LIMIT);
                entries
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable history");
                Vec::new()
            }
        };
        tracing::debug!(path = %path.display(), count = entries.len(), "history loaded");
        HistoryCache { path, entries }
    }

    /// Record a new generation.
    ///
    /// The in-memory list is updated first; an `Err` means only the
    /// write to disk failed.
    pub fn record(&mut self, record: GeneratedImageRecord) -> io::Result<&[GeneratedImageRecord]> {
        push_bounded(&mut self.entries, record, HISTORY_LIMIT);
        write_entries(&self.path, &self.entries)?;
        Ok(&self.entries)
    }

    /// All records, newest first.
    pub fn entries(&self) -> &[GeneratedImageRecord] {
        &self.entries
    }

    /// Record at a list position.
    pub fn get(&self, index: usize) -> Option<&GeneratedImageRecord> {
        self.entries.get(index)
    }

    /// Record with the given id.
    pub fn find(&self, id: &str) -> Option<&GeneratedImageRecord> {
        self.entries.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

// ============================================================================
// EFFECT FUNCTIONS (I/O)
// ============================================================================

fn read_entries(path: &Path) -> io::Result<Vec<GeneratedImageRecord>> {
    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Write the full list, replacing the previous snapshot atomically.
fn write_entries(path: &Path, entries: &[GeneratedImageRecord]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(entries)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)
}

// ============================================================================
// TESTS
// ============================================================================
