//! Hashing engine
//!
//! Brings a [`HashIndex`] up to date for one hash kind over a candidate
//! file set. Construction filters the candidates down to the files that
//! actually need work, which makes re-runs incremental: a file already
//! holding a value for the kind is never recomputed.
//!
//! Work units are fully independent; workers only compute and return
//! values, and the coordinating thread alone writes into the index as
//! results are collected. A shutdown flag is observed per unit so an
//! interrupt abandons remaining work while completed results are kept.

use crate::index::HashIndex;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Per-file hash function: yields a hex value, or nothing on failure
/// (the function is expected to log its own failures).
pub type HashFn<'a> = &'a (dyn Fn(&Path) -> Option<String> + Sync);

/// Updates one hash kind of an index across a bounded worker pool
pub struct HashingEngine<'a> {
    /// Hash kind this engine maintains
    kind: &'a str,

    /// Per-file hash function
    hash_fn: HashFn<'a>,

    /// Number of parallel workers (minimum 1)
    workers: usize,

    /// Filtered work set: candidates that exist and lack a value
    work: Vec<PathBuf>,
}

impl<'a> HashingEngine<'a> {
    /// Create an engine for the given kind over the candidate files.
    ///
    /// Candidates that do not exist on disk are dropped with a warning;
    /// candidates already holding a value for the kind are dropped
    /// silently. A worker count of 0 is treated as 1.
    pub fn new(
        index: &HashIndex,
        kind: &'a str,
        candidates: &[PathBuf],
        hash_fn: HashFn<'a>,
        workers: usize,
    ) -> Self {
        let mut work = Vec::new();

        for path in candidates {
            if !path.exists() {
                warn!("File not found: {}", path.display());
                continue;
            }
            if index.has(path, kind) {
                continue;
            }
            work.push(path.clone());
        }

        Self {
            kind,
            hash_fn,
            workers: workers.max(1),
            work,
        }
    }

    /// Number of files that will actually be hashed
    pub fn pending(&self) -> usize {
        self.work.len()
    }

    /// Run the engine, writing produced values into the index.
    ///
    /// Returns the number of values written. Files whose hash function
    /// yields nothing retain no entry and are retried on the next run.
    pub fn run(&self, index: &mut HashIndex, shutdown: &AtomicBool) -> usize {
        self.run_with_progress(index, shutdown, |_, _| {})
    }

    /// Like [`run`](Self::run), invoking `progress(completed, total)`
    /// after every finished unit of work.
    pub fn run_with_progress<F>(
        &self,
        index: &mut HashIndex,
        shutdown: &AtomicBool,
        progress: F,
    ) -> usize
    where
        F: Fn(usize, usize) + Sync,
    {
        if self.work.is_empty() {
            info!("No files to hash for kind '{}'", self.kind);
            return 0;
        }

        let results = if self.workers > 1 {
            self.hash_parallel(shutdown, &progress)
        } else {
            self.hash_sequential(shutdown, &progress)
        };

        if shutdown.load(Ordering::SeqCst) {
            info!(
                "Hashing '{}' interrupted; keeping {} completed result(s)",
                self.kind,
                results.iter().filter(|(_, v)| v.is_some()).count()
            );
        }

        // The coordinator is the only writer; workers never touch the index.
        let mut written = 0;
        for (path, value) in results {
            if let Some(value) = value {
                index.set(path, self.kind, value);
                written += 1;
            }
        }

        info!(
            "Hashed {}/{} file(s) for kind '{}'",
            written,
            self.work.len(),
            self.kind
        );

        written
    }

    /// Process the work set sequentially
    fn hash_sequential<F>(
        &self,
        shutdown: &AtomicBool,
        progress: &F,
    ) -> Vec<(&PathBuf, Option<String>)>
    where
        F: Fn(usize, usize) + Sync,
    {
        info!("Hashing {} file(s) serially", self.work.len());

        let total = self.work.len();
        let mut results = Vec::with_capacity(total);

        for (done, path) in self.work.iter().enumerate() {
            if shutdown.load(Ordering::SeqCst) {
                break;
            }
            debug!("Hashing {}", path.display());
            results.push((path, (self.hash_fn)(path)));
            progress(done + 1, total);
        }

        results
    }

    /// Process the work set on a pool of exactly `workers` threads
    fn hash_parallel<F>(
        &self,
        shutdown: &AtomicBool,
        progress: &F,
    ) -> Vec<(&PathBuf, Option<String>)>
    where
        F: Fn(usize, usize) + Sync,
    {
        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
        {
            Ok(pool) => pool,
            Err(e) => {
                warn!("Failed to build worker pool ({}), hashing serially", e);
                return self.hash_sequential(shutdown, progress);
            }
        };

        info!(
            "Hashing {} file(s) with {} workers",
            self.work.len(),
            self.workers
        );

        let total = self.work.len();
        let completed = AtomicUsize::new(0);

        pool.install(|| {
            self.work
                .par_iter()
                .map(|path| {
                    // Abandon remaining units once an interrupt is requested
                    if shutdown.load(Ordering::SeqCst) {
                        return (path, None);
                    }

                    debug!("Hashing {}", path.display());
                    let value = (self.hash_fn)(path);

                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    progress(done, total);

                    (path, value)
                })
                .collect()
        })
    }
}
