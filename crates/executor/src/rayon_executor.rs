//! Rayon-based parallel executor.
//!
//! Each executor owns a dedicated pool so the configured worker count is a hard
//! bound on concurrent pages, independent of rayon's global pool.

use peel_traits::{Executor, ExecutorError};
use rayon::prelude::*;
use std::sync::Arc;

/// A parallel executor backed by its own rayon thread pool.
///
/// Results always come back in input order: rayon's indexed `collect` places
/// each output in the slot of its input, whatever order the workers finish in.
///
/// # Example
///
/// ```ignore
/// use peel_executor::RayonExecutor;
/// use peel_traits::Executor;
///
/// let executor = RayonExecutor::with_threads(4)?;
/// let results: Result<Vec<i32>, String> = executor.try_execute_all(vec![1, 2, 3], |x| Ok(x * 2));
/// assert_eq!(results?, vec![2, 4, 6]);
/// ```
#[derive(Debug, Clone)]
pub struct RayonExecutor {
    pool: Arc<rayon::ThreadPool>,
    num_threads: usize,
}

impl RayonExecutor {
    /// Creates an executor with a pool of exactly `threads` workers (minimum 1).
    pub fn with_threads(threads: usize) -> Result<Self, ExecutorError> {
        let threads = threads.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("peel-worker-{}", i))
            .build()
            .map_err(|e| ExecutorError::new(format!("failed to build thread pool: {}", e)))?;
        log::debug!("[RAYON] Built analysis pool with {} threads", threads);
        Ok(Self {
            pool: Arc::new(pool),
            num_threads: threads,
        })
    }
}

impl Executor for RayonExecutor {
    fn try_execute_all<T, R, E, F>(&self, items: Vec<T>, f: F) -> Result<Vec<R>, E>
    where
        T: Send + 'static,
        R: Send + 'static,
        E: Send + 'static,
        F: Fn(T) -> Result<R, E> + Send + Sync + Clone + 'static,
    {
        // Collecting into Result stops handing out new items once one fails.
        self.pool
            .install(|| items.into_par_iter().map(f).collect::<Result<Vec<R>, E>>())
    }

    fn parallelism(&self) -> usize {
        self.num_threads
    }

    fn name(&self) -> &'static str {
        "RayonExecutor"
    }
}
