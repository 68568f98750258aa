//! Core search engine: walker, filter pipeline and collector wired together
use crate::cancel::CancelToken;
use crate::collector::{Collector, ResultSet};
use crate::entry::Entry;
use crate::error::{EntryAccessError, Result};
use crate::filter::FilterPipeline;
use crate::search::{SearchConfig, SearchOptions};
use crate::walker::{TraversalStats, Walker};
use log::{info, warn};
use parking_lot::Mutex;
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Everything a search produced. Only configuration problems fail a search; entries
/// that could not be read end up in `diagnostics`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchOutcome {
    pub result: ResultSet,
    pub diagnostics: Vec<EntryAccessError>,
    pub stats: TraversalStats,
    pub cancelled: bool,
    #[serde(skip)]
    pub elapsed: Duration,
}

#[derive(Default)]
struct Sink {
    diagnostics: Vec<EntryAccessError>,
    stats: TraversalStats,
    cancelled: bool,
}

impl Sink {
    fn absorb(&mut self, walker: Walker<'_>) {
        let (diagnostics, stats, cancelled) = walker.into_parts();
        self.diagnostics.extend(diagnostics);
        self.count(&stats, cancelled);
    }

    fn count(&mut self, stats: &TraversalStats, cancelled: bool) {
        self.stats.merge(stats);
        self.cancelled |= cancelled;
    }
}

/// Runs one validated configuration.
pub struct SearchEngine {
    config: SearchConfig,
    pipeline: FilterPipeline,
    cancel: CancelToken,
    threads: Option<usize>,
}

impl SearchEngine {
    pub fn new(config: SearchConfig) -> Self {
        let pipeline = FilterPipeline::from_config(&config);
        Self {
            config,
            pipeline,
            cancel: CancelToken::new(),
            threads: None,
        }
    }

    pub fn from_options(options: &SearchOptions) -> Result<Self> {
        Ok(Self::new(options.build()?))
    }

    /// Shares an externally owned cancellation flag with the engine.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Size of the dedicated pool used by [`SearchEngine::run_parallel`].
    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads.filter(|&n| n > 0);
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Lazily yields the matching entries, in result order but without path
    /// deduplication across roots.
    pub fn matches(&self) -> impl Iterator<Item = Entry> + '_ {
        Walker::new(&self.config, self.cancel.clone()).filter(|entry| self.pipeline.matches(entry))
    }

    /// Single-threaded search.
    pub fn run(&self) -> SearchOutcome {
        let start = Instant::now();
        info!(
            "searching {} root(s) with {} filter(s)",
            self.config.roots().len(),
            self.pipeline.len()
        );

        let mut collector = Collector::new();
        let mut walker = Walker::new(&self.config, self.cancel.clone());
        for entry in walker.by_ref() {
            if self.pipeline.matches(&entry) {
                collector.push(entry.path);
            }
        }

        let mut sink = Sink::default();
        sink.absorb(walker);
        self.finish(collector, sink, start)
    }

    /// Walks each root on the rayon pool. Per-root results and diagnostics are merged
    /// in root order, so the outcome is the same as [`SearchEngine::run`].
    pub fn run_parallel(&self) -> SearchOutcome {
        let start = Instant::now();
        info!(
            "searching {} root(s) in parallel with {} filter(s)",
            self.config.roots().len(),
            self.pipeline.len()
        );

        let sink = Mutex::new(Sink::default());
        let walk_all = || -> Vec<(Vec<PathBuf>, Vec<EntryAccessError>)> {
            self.config
                .roots()
                .par_iter()
                .map(|root| {
                    let mut walker =
                        Walker::with_roots(&self.config, vec![root.clone()], self.cancel.clone());
                    let paths: Vec<PathBuf> = walker
                        .by_ref()
                        .filter(|entry| self.pipeline.matches(entry))
                        .map(|entry| entry.path)
                        .collect();
                    let (diagnostics, stats, cancelled) = walker.into_parts();
                    sink.lock().count(&stats, cancelled);
                    (paths, diagnostics)
                })
                .collect()
        };

        let per_root = match self.threads {
            Some(threads) => match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => pool.install(walk_all),
                Err(e) => {
                    warn!("could not build a {threads}-thread pool, using the global one: {e}");
                    walk_all()
                }
            },
            None => walk_all(),
        };

        let mut collector = Collector::new();
        let mut sink = sink.into_inner();
        for (paths, diagnostics) in per_root {
            collector.absorb(paths);
            sink.diagnostics.extend(diagnostics);
        }
        self.finish(collector, sink, start)
    }

    fn finish(&self, collector: Collector, sink: Sink, start: Instant) -> SearchOutcome {
        let result = collector.finish();
        let elapsed = start.elapsed();
        info!(
            "matched {} of {} visited object(s) in {:.2?} ({} skipped)",
            result.matched(),
            sink.stats.visited,
            elapsed,
            sink.stats.skipped
        );
        if sink.cancelled {
            warn!("search cancelled, result is partial");
        }

        SearchOutcome {
            result,
            diagnostics: sink.diagnostics,
            stats: sink.stats,
            cancelled: sink.cancelled,
            elapsed,
        }
    }
}
