//! Search options, their validation, and the engine that runs them
pub mod engine;
pub mod identity;
pub mod perm;

use crate::error::ConfigError;
use globset::{GlobBuilder, GlobMatcher};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub use engine::{SearchEngine, SearchOutcome};
pub use perm::{PermMatcher, PermMode};

/// Kind of object a search selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(try_from = "String", into = "String")]
pub enum FileType {
    #[default]
    File,
    Directory,
    #[value(name = "link", alias = "symlink")]
    Symlink,
}

impl FromStr for FileType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" | "f" => Ok(FileType::File),
            "directory" | "d" => Ok(FileType::Directory),
            "link" | "symlink" | "l" => Ok(FileType::Symlink),
            other => Err(ConfigError::UnknownFileType(other.to_string())),
        }
    }
}

impl TryFrom<String> for FileType {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FileType> for String {
    fn from(ft: FileType) -> Self {
        ft.to_string()
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileType::File => write!(f, "file"),
            FileType::Directory => write!(f, "directory"),
            FileType::Symlink => write!(f, "link"),
        }
    }
}

/// Compiled shell glob matched against an entry's base name.
#[derive(Debug, Clone)]
pub struct NamePattern {
    pattern: String,
    matcher: GlobMatcher,
}

impl NamePattern {
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .backslash_escape(true)
            .build()
            .map_err(|e| ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.kind().to_string(),
            })?;

        Ok(Self {
            pattern: pattern.to_string(),
            matcher: glob.compile_matcher(),
        })
    }

    pub fn is_match(&self, name: &OsStr) -> bool {
        self.matcher.is_match(Path::new(name))
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}

/// Raw search options, before validation.
///
/// Field names follow the module parameters the engine replaces. Empty strings
/// for `perms`, `user`, `group` and `name` mean "not set".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub paths: Vec<PathBuf>,
    pub file_type: FileType,
    pub perms: Option<String>,
    pub xdev: bool,
    pub links: bool,
    pub mindepth: Option<usize>,
    pub maxdepth: Option<usize>,
    pub user: Option<String>,
    pub group: Option<String>,
    pub name: Option<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            file_type: FileType::File,
            perms: None,
            xdev: true,
            links: false,
            mindepth: None,
            maxdepth: None,
            user: None,
            group: None,
            name: None,
        }
    }
}

impl SearchOptions {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_file_type(mut self, file_type: FileType) -> Self {
        self.file_type = file_type;
        self
    }

    pub fn with_perms(mut self, perms: impl Into<String>) -> Self {
        self.perms = Some(perms.into());
        self
    }

    pub fn with_xdev(mut self, xdev: bool) -> Self {
        self.xdev = xdev;
        self
    }

    pub fn with_links(mut self, links: bool) -> Self {
        self.links = links;
        self
    }

    pub fn with_mindepth(mut self, depth: usize) -> Self {
        self.mindepth = Some(depth);
        self
    }

    pub fn with_maxdepth(mut self, depth: usize) -> Self {
        self.maxdepth = Some(depth);
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Validates the options and resolves identities, producing an immutable config.
    pub fn build(&self) -> Result<SearchConfig, ConfigError> {
        if self.paths.is_empty() {
            return Err(ConfigError::NoRoots);
        }
        for root in &self.paths {
            validate_root(root)?;
        }

        if let (Some(min), Some(max)) = (self.mindepth, self.maxdepth) {
            if min > max {
                return Err(ConfigError::InvertedDepth { min, max });
            }
        }

        let perm = non_empty(&self.perms).map(PermMatcher::parse).transpose()?;
        let uid = non_empty(&self.user)
            .map(identity::resolve_user)
            .transpose()?;
        let gid = non_empty(&self.group)
            .map(identity::resolve_group)
            .transpose()?;
        let name = non_empty(&self.name).map(NamePattern::new).transpose()?;

        Ok(SearchConfig {
            roots: self.paths.clone(),
            file_type: self.file_type,
            perm,
            cross_mounts: !self.xdev,
            follow_symlinks: self.links,
            min_depth: self.mindepth,
            max_depth: self.maxdepth,
            uid,
            gid,
            name,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn validate_root(root: &Path) -> Result<(), ConfigError> {
    if !root.is_absolute() {
        return Err(ConfigError::RelativeRoot(root.to_path_buf()));
    }
    match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ConfigError::RootNotDirectory(root.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(ConfigError::RootNotFound(root.to_path_buf()))
        }
        Err(e) => Err(ConfigError::RootUnreadable {
            path: root.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

/// Validated search configuration. Immutable once built.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    roots: Vec<PathBuf>,
    file_type: FileType,
    perm: Option<PermMatcher>,
    cross_mounts: bool,
    follow_symlinks: bool,
    min_depth: Option<usize>,
    max_depth: Option<usize>,
    uid: Option<u32>,
    gid: Option<u32>,
    name: Option<NamePattern>,
}

impl SearchConfig {
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    pub fn perm(&self) -> Option<&PermMatcher> {
        self.perm.as_ref()
    }

    pub fn cross_mounts(&self) -> bool {
        self.cross_mounts
    }

    pub fn follow_symlinks(&self) -> bool {
        self.follow_symlinks
    }

    pub fn min_depth(&self) -> Option<usize> {
        self.min_depth
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn uid(&self) -> Option<u32> {
        self.uid
    }

    pub fn gid(&self) -> Option<u32> {
        self.gid
    }

    pub fn name(&self) -> Option<&NamePattern> {
        self.name.as_ref()
    }
}
