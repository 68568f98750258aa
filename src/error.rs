use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Rejections raised while validating search options, before any traversal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("at least one search path is required")]
    NoRoots,

    #[error("search path must be absolute: {0}")]
    RelativeRoot(PathBuf),

    #[error("search path does not exist: {0}")]
    RootNotFound(PathBuf),

    #[error("search path cannot be read: {path}: {reason}")]
    RootUnreadable { path: PathBuf, reason: String },

    #[error("search path is not a directory: {0}")]
    RootNotDirectory(PathBuf),

    #[error("unknown user: {0}")]
    UnknownUser(String),

    #[error("unknown group: {0}")]
    UnknownGroup(String),

    #[error("mindepth ({min}) is greater than maxdepth ({max})")]
    InvertedDepth { min: usize, max: usize },

    #[error("invalid permission expression '{expr}': {reason}")]
    InvalidPermission { expr: String, reason: String },

    #[error("invalid name pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("unknown file type '{0}' (expected file, directory or link)")]
    UnknownFileType(String),
}

#[derive(Error, Debug)]
pub enum FastfindError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read config file '{path}': {source}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("An unexpected error occurred: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, FastfindError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessErrorKind {
    PermissionDenied,
    NotFound,
    Other,
}

impl From<io::ErrorKind> for AccessErrorKind {
    fn from(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::PermissionDenied => AccessErrorKind::PermissionDenied,
            io::ErrorKind::NotFound => AccessErrorKind::NotFound,
            _ => AccessErrorKind::Other,
        }
    }
}

/// A per-entry failure during traversal. The entry is skipped and the walk goes on.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct EntryAccessError {
    pub path: Option<PathBuf>,
    pub depth: usize,
    pub kind: AccessErrorKind,
    pub message: String,
}

impl EntryAccessError {
    pub fn from_io(path: Option<PathBuf>, depth: usize, err: &io::Error) -> Self {
        Self {
            path,
            depth,
            kind: err.kind().into(),
            message: err.to_string(),
        }
    }
}

impl From<walkdir::Error> for EntryAccessError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(|p| p.to_path_buf());
        let depth = err.depth();
        let kind = err
            .io_error()
            .map(|e| AccessErrorKind::from(e.kind()))
            .unwrap_or(AccessErrorKind::Other);
        Self {
            path,
            depth,
            kind,
            message: err.to_string(),
        }
    }
}

impl fmt::Display for EntryAccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {}", path.display(), self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for EntryAccessError {}
