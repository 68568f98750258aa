//! In-process file-tree search with `find`-style filtering.
//!
//! A [`SearchOptions`] value is validated into a [`SearchConfig`], then a
//! [`SearchEngine`] walks every root, keeps the entries accepted by all configured
//! predicates and returns them as an ordered [`ResultSet`].
//!
//! ```no_run
//! use fastfind::{search, SearchOptions};
//!
//! let options = SearchOptions::new(["/bin", "/usr/bin"]).with_perms("/6000");
//! let outcome = search(&options)?;
//! for path in outcome.result.iter() {
//!     println!("{}", path.display());
//! }
//! # Ok::<(), fastfind::FastfindError>(())
//! ```
pub mod cancel;
pub mod cli;
pub mod collector;
pub mod config;
pub mod entry;
pub mod error;
pub mod filter;
pub mod output;
pub mod search;
pub mod walker;

pub use crate::cancel::CancelToken;
pub use crate::collector::{Collector, ResultSet};
pub use crate::config::Config;
pub use crate::entry::{Entry, EntryKind};
pub use crate::error::{ConfigError, EntryAccessError, FastfindError, Result};
pub use crate::filter::{FilterPipeline, Predicate};
pub use crate::search::{
    FileType, NamePattern, PermMatcher, PermMode, SearchConfig, SearchEngine, SearchOptions,
    SearchOutcome,
};
pub use crate::walker::{TraversalStats, Walker};

/// Validates `options` and runs a single-threaded search.
pub fn search(options: &SearchOptions) -> Result<SearchOutcome> {
    Ok(SearchEngine::from_options(options)?.run())
}
