use serde::Serialize;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntryKind {
    Dir,
    File,
}

/// One entry in the materialized directory tree. Directory sizes are the
/// recursive sum of everything underneath them.
#[derive(Debug, Clone, Serialize)]
pub struct EntryNode {
    pub name: String,
    pub kind: EntryKind,
    pub size: u64,
    pub children: Vec<EntryNode>,
    /// set when the directory itself could not be read
    pub error: Option<String>,
}

impl EntryNode {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// Everything one walk of the filesystem produces.
#[derive(Debug, Serialize)]
pub struct UsageReport {
    pub root: EntryNode,
    pub total_bytes: u64,
    pub extension_totals: BTreeMap<String, u64>,
    pub errors: Vec<ScanError>,
    pub file_count: u64,
    pub dir_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtensionEntry {
    pub extension: String,
    pub total_bytes: u64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct VolumeStats {
    pub capacity_bytes: u64,
    pub free_bytes: u64,
}

impl VolumeStats {
    pub fn used_bytes(&self) -> u64 {
        self.capacity_bytes.saturating_sub(self.free_bytes)
    }

    pub fn free_percent(&self) -> f64 {
        if self.capacity_bytes == 0 {
            0.0
        } else {
            self.free_bytes as f64 / self.capacity_bytes as f64 * 100.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScanErrorKind {
    NotFound,
    PermissionDenied,
    Other,
}

/// A non-fatal failure recorded during the walk. The entry it refers to is
/// skipped but the rest of the scan carries on.
#[derive(Debug, Clone, Serialize)]
pub struct ScanError {
    pub path: PathBuf,
    pub kind: ScanErrorKind,
    pub message: String,
}

impl ScanError {
    pub fn new(path: &Path, err: &io::Error) -> Self {
        let kind = match err.kind() {
            io::ErrorKind::NotFound => ScanErrorKind::NotFound,
            io::ErrorKind::PermissionDenied => ScanErrorKind::PermissionDenied,
            _ => ScanErrorKind::Other,
        };
        ScanError {
            path: path.to_path_buf(),
            kind,
            message: err.to_string(),
        }
    }
}

/// Ordering applied to sibling entries when the tree is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SortKey {
    #[default]
    Name,
    Size,
}

impl SortKey {
    pub fn parse(input: &str) -> Option<SortKey> {
        match input.trim().to_lowercase().as_str() {
            "n" | "name" => Some(SortKey::Name),
            "s" | "size" => Some(SortKey::Size),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("volume query failed for '{0}': {1}")]
    Volume(String, String),
}
