//! A thin "run this body for every index in a range, maybe in parallel"
//! abstraction (§9), so the pipeline's parallel phases can be forced
//! sequential for deterministic tests without threading an `if` through each
//! call site.

use std::num::NonZeroUsize;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Runs per-index work either on a dedicated Rayon thread pool, or inline on
/// the calling thread when configured with a pool size of 1.
///
/// Constructed once per [`crate::driver::build_cluster_hierarchy`] call and
/// reused across every hierarchy level.
pub struct LoopRunner {
    pool: Option<ThreadPool>,
}

impl LoopRunner {
    /// Builds a runner backed by a Rayon thread pool of `thread_pool_size`
    /// workers. A size of 1 builds a runner that never touches Rayon's
    /// infrastructure at all, so single-threaded builds stay deterministic
    /// and independent of any global thread pool the host process may have
    /// configured.
    #[must_use]
    pub fn new(thread_pool_size: NonZeroUsize) -> Self {
        if thread_pool_size.get() == 1 {
            return Self::sequential();
        }
        // Building a dedicated pool never fails under supported configurations;
        // fall back to sequential execution rather than propagating a
        // platform-level thread-spawn failure through the public API.
        let pool = ThreadPoolBuilder::new()
            .num_threads(thread_pool_size.get())
            .build()
            .ok();
        Self { pool }
    }

    /// Builds a runner that always executes inline on the calling thread.
    #[must_use]
    pub const fn sequential() -> Self {
        Self { pool: None }
    }

    /// Runs `body(i)` for every `i` in `0..count`, for side effects only.
    pub fn run(&self, count: usize, body: impl Fn(usize) + Sync) {
        match &self.pool {
            Some(pool) => pool.install(|| (0..count).into_par_iter().for_each(&body)),
            None => (0..count).for_each(&body),
        }
    }

    /// Runs `body(i)` for every `i` in `0..count`, collecting the results in
    /// index order.
    #[must_use]
    pub fn run_collect<T: Send>(&self, count: usize, body: impl Fn(usize) -> T + Sync) -> Vec<T> {
        match &self.pool {
            Some(pool) => pool.install(|| (0..count).into_par_iter().map(&body).collect()),
            None => (0..count).map(&body).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn sequential_runner_visits_every_index() {
        let runner = LoopRunner::sequential();
        let seen = AtomicUsize::new(0);
        runner.run(10, |_| {
            seen.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(seen.load(Ordering::Relaxed), 10);
    }

    #[test]
    fn run_collect_preserves_index_order() {
        let runner = LoopRunner::sequential();
        let results = runner.run_collect(5, |i| i * 2);
        assert_eq!(results, vec![0, 2, 4, 6, 8]);
    }

    #[test]
    fn pooled_runner_collects_all_results() {
        let runner = LoopRunner::new(NonZeroUsize::new(4).expect("non-zero"));
        let results = runner.run_collect(100, |i| i);
        assert_eq!(results.len(), 100);
        assert_eq!(results.iter().sum::<usize>(), (0..100).sum());
    }

    #[test]
    fn pool_size_one_never_builds_a_pool() {
        let runner = LoopRunner::new(NonZeroUsize::new(1).expect("non-zero"));
        assert!(runner.pool.is_none());
    }
}
