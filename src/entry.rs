//! Filesystem objects as seen by the walker
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::fs::{self, Metadata};
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

/// Permission bits kept on an entry: rwx for all classes plus setuid, setgid, sticky.
pub const PERM_BITS: u32 = 0o7777;

/// Kind of a visited object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    /// Fifos, sockets, block and character devices.
    Other,
}

impl EntryKind {
    pub fn from_file_type(ft: fs::FileType) -> Self {
        if ft.is_symlink() {
            EntryKind::Symlink
        } else if ft.is_dir() {
            EntryKind::Directory
        } else if ft.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::File => write!(f, "file"),
            EntryKind::Directory => write!(f, "directory"),
            EntryKind::Symlink => write!(f, "link"),
            EntryKind::Other => write!(f, "other"),
        }
    }
}

/// One visited filesystem object with the metadata the filters look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    pub depth: usize,
    pub kind: EntryKind,
    /// For a symlink that was not followed: the kind of what it points at, resolved
    /// once. `None` for dangling links and for every other kind.
    pub target_kind: Option<EntryKind>,
    pub dev: u64,
    pub ino: u64,
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub name: OsString,
}

impl Entry {
    /// Builds an entry from metadata that was already fetched for `path`.
    pub fn from_metadata(path: &Path, depth: usize, meta: &Metadata) -> Self {
        let kind = EntryKind::from_file_type(meta.file_type());
        let target_kind = if kind == EntryKind::Symlink {
            fs::metadata(path)
                .ok()
                .map(|m| EntryKind::from_file_type(m.file_type()))
        } else {
            None
        };

        Self {
            path: path.to_path_buf(),
            depth,
            kind,
            target_kind,
            dev: meta.dev(),
            ino: meta.ino(),
            mode: meta.mode() & PERM_BITS,
            uid: meta.uid(),
            gid: meta.gid(),
            name: base_name(path),
        }
    }

    /// Builds an entry from a walkdir entry. Metadata follows the link when the
    /// walk was configured to follow symlinks.
    pub fn from_dir_entry(dent: &walkdir::DirEntry) -> Result<Self, walkdir::Error> {
        let meta = dent.metadata()?;
        Ok(Self::from_metadata(dent.path(), dent.depth(), &meta))
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Identity of the underlying object, used for cycle detection.
    pub fn file_id(&self) -> (u64, u64) {
        (self.dev, self.ino)
    }
}

fn base_name(path: &Path) -> OsString {
    path.file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| path.as_os_str().to_os_string())
}
