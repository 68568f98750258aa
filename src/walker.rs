//! Depth-first traversal of the search roots
use crate::cancel::CancelToken;
use crate::entry::Entry;
use crate::error::EntryAccessError;
use crate::search::SearchConfig;
use log::{debug, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Counters gathered while walking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TraversalStats {
    /// Objects read from the filesystem, including those outside the depth window.
    pub visited: usize,
    /// Objects skipped because they could not be read.
    pub skipped: usize,
    /// Directories not entered again because they were already walked.
    pub cycles: usize,
    /// Objects reached again through another link and not emitted twice.
    pub duplicates: usize,
}

impl TraversalStats {
    pub fn merge(&mut self, other: &TraversalStats) {
        self.visited += other.visited;
        self.skipped += other.skipped;
        self.cycles += other.cycles;
        self.duplicates += other.duplicates;
    }
}

fn walk_root(root: &Path, config: &SearchConfig) -> walkdir::IntoIter {
    let mut walk = WalkDir::new(root)
        .follow_links(config.follow_symlinks())
        .same_file_system(!config.cross_mounts())
        .sort_by(|a, b| a.file_name().cmp(b.file_name()));
    if let Some(max) = config.max_depth() {
        walk = walk.max_depth(max);
    }
    walk.into_iter()
}

struct RootWalk {
    iter: walkdir::IntoIter,
    root_dev: u64,
    /// `(device, inode)` of every directory entered from this root.
    visited: HashSet<(u64, u64)>,
    /// `(device, inode)` of every entry emitted from this root.
    emitted: HashSet<(u64, u64)>,
}

/// Lazy sequence of entries for one or more roots, in root order and depth-first
/// within a root. Unreadable entries are recorded as diagnostics and skipped.
pub struct Walker<'a> {
    config: &'a SearchConfig,
    roots: Vec<PathBuf>,
    next_root: usize,
    current: Option<RootWalk>,
    cancel: CancelToken,
    diagnostics: Vec<EntryAccessError>,
    stats: TraversalStats,
    cancelled: bool,
}

impl<'a> Walker<'a> {
    /// Walks every root of the config.
    pub fn new(config: &'a SearchConfig, cancel: CancelToken) -> Self {
        Self::with_roots(config, config.roots().to_vec(), cancel)
    }

    /// Walks the given roots with the policies of `config`.
    pub fn with_roots(config: &'a SearchConfig, roots: Vec<PathBuf>, cancel: CancelToken) -> Self {
        Self {
            config,
            roots,
            next_root: 0,
            current: None,
            cancel,
            diagnostics: Vec::new(),
            stats: TraversalStats::default(),
            cancelled: false,
        }
    }

    pub fn diagnostics(&self) -> &[EntryAccessError] {
        &self.diagnostics
    }

    pub fn stats(&self) -> TraversalStats {
        self.stats
    }

    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn into_parts(self) -> (Vec<EntryAccessError>, TraversalStats, bool) {
        (self.diagnostics, self.stats, self.cancelled)
    }

    fn record(&mut self, err: EntryAccessError) {
        warn!("skipping {err}");
        self.stats.skipped += 1;
        self.diagnostics.push(err);
    }

}

impl Iterator for Walker<'_> {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        loop {
            if self.cancel.is_cancelled() {
                if !self.cancelled {
                    debug!("traversal cancelled");
                    self.cancelled = true;
                    self.current = None;
                }
                return None;
            }

            if self.current.is_none() {
                let root = self.roots.get(self.next_root)?;
                debug!("walking {}", root.display());
                self.current = Some(RootWalk {
                    iter: walk_root(root, self.config),
                    root_dev: 0,
                    visited: HashSet::new(),
                    emitted: HashSet::new(),
                });
                self.next_root += 1;
            }
            let walk = self.current.as_mut()?;

            let dent = match walk.iter.next() {
                None => {
                    self.current = None;
                    continue;
                }
                Some(Err(err)) => {
                    if err.loop_ancestor().is_some() {
                        debug!("not following cycle: {err}");
                        self.stats.cycles += 1;
                    } else {
                        self.record(EntryAccessError::from(err));
                    }
                    continue;
                }
                Some(Ok(dent)) => dent,
            };

            self.stats.visited += 1;
            let entry = match Entry::from_dir_entry(&dent) {
                Ok(entry) => entry,
                Err(err) => {
                    self.record(EntryAccessError::from(err));
                    continue;
                }
            };

            if entry.depth == 0 {
                walk.root_dev = entry.dev;
            }
            // walkdir only opens directories on the root's device unless crossing is
            // allowed, and skip_current_dir must only be called for an opened one.
            let descends =
                entry.is_dir() && (self.config.cross_mounts() || entry.dev == walk.root_dev);
            let follow = self.config.follow_symlinks();
            // Directories at max_depth are opened by walkdir but their children are never read.
            let reads_children = self.config.max_depth().map_or(true, |max| entry.depth < max);

            if follow && descends && reads_children && !walk.visited.insert(entry.file_id())
            {
                debug!("already walked {}, not entering again", entry.path.display());
                walk.iter.skip_current_dir();
                self.stats.cycles += 1;
                continue;
            }

            if self.config.min_depth().is_some_and(|min| entry.depth < min) {
                continue;
            }
            // Another link to an object already emitted: its children may still be new.
            if follow && !walk.emitted.insert(entry.file_id()) {
                debug!("already emitted {}", entry.path.display());
                self.stats.duplicates += 1;
                continue;
            }
            return Some(entry);
        }
    }
}
