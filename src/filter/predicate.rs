//! Single-attribute tests against an entry
use crate::entry::{Entry, EntryKind};
use crate::search::{FileType, NamePattern, PermMatcher};

/// One configured constraint. Evaluation is pure and never touches the filesystem.
#[derive(Debug, Clone)]
pub enum Predicate {
    Type(FileType),
    Owner(u32),
    Group(u32),
    Perm(PermMatcher),
    Name(NamePattern),
}

impl Predicate {
    pub fn test(&self, entry: &Entry) -> bool {
        match self {
            Predicate::Type(ft) => type_matches(*ft, entry.kind),
            Predicate::Owner(uid) => entry.uid == *uid,
            Predicate::Group(gid) => entry.gid == *gid,
            Predicate::Perm(perm) => perm.matches(entry.mode),
            Predicate::Name(pattern) => pattern.is_match(&entry.name),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Predicate::Type(_) => "type",
            Predicate::Owner(_) => "user",
            Predicate::Group(_) => "group",
            Predicate::Perm(_) => "perm",
            Predicate::Name(_) => "name",
        }
    }

    /// Relative evaluation cost; the pipeline runs cheaper predicates first.
    pub(crate) fn cost(&self) -> u8 {
        match self {
            Predicate::Type(_) => 0,
            Predicate::Owner(_) | Predicate::Group(_) => 1,
            Predicate::Perm(_) => 2,
            Predicate::Name(_) => 3,
        }
    }
}

/// Symlinks are their own kind; a link to a file is not a file.
fn type_matches(ft: FileType, kind: EntryKind) -> bool {
    matches!(
        (ft, kind),
        (FileType::File, EntryKind::File)
            | (FileType::Directory, EntryKind::Directory)
            | (FileType::Symlink, EntryKind::Symlink)
    )
}
