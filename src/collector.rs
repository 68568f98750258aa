//! Ordered, deduplicated accumulation of matched paths
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Matched paths in traversal order, and their count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultSet {
    #[serde(serialize_with = "serialize_paths")]
    files: Vec<PathBuf>,
    matched: usize,
}

impl ResultSet {
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn matched(&self) -> usize {
        self.matched
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(PathBuf::as_path)
    }

    pub fn into_files(self) -> Vec<PathBuf> {
        self.files
    }
}

fn serialize_paths<S: Serializer>(paths: &[PathBuf], serializer: S) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(paths.len()))?;
    for path in paths {
        seq.serialize_element(&path.to_string_lossy())?;
    }
    seq.end()
}

/// Single-writer sink the engine pushes matches into. A path seen before is ignored,
/// so overlapping roots do not report an object twice.
#[derive(Debug, Default)]
pub struct Collector {
    files: Vec<PathBuf>,
    seen: HashSet<PathBuf>,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `path` unless it was already collected. Returns whether it was added.
    pub fn push(&mut self, path: PathBuf) -> bool {
        if self.seen.contains(&path) {
            return false;
        }
        self.seen.insert(path.clone());
        self.files.push(path);
        true
    }

    /// Appends a batch gathered elsewhere, keeping its order.
    pub fn absorb<I: IntoIterator<Item = PathBuf>>(&mut self, paths: I) {
        for path in paths {
            self.push(path);
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn finish(self) -> ResultSet {
        let matched = self.files.len();
        ResultSet {
            files: self.files,
            matched,
        }
    }
}
