//! Executor implementations for the peel analysis stage.
//!
//! ## Available Executors
//!
//! - [`RayonExecutor`]: Bounded work-stealing thread pool (feature: `rayon`)
//! - [`SyncExecutor`]: Sequential execution (re-exported from peel-traits)
//!
//! ## Usage
//!
//! ```ignore
//! use peel_executor::ExecutorImpl;
//! use peel_traits::Executor;
//!
//! let executor = ExecutorImpl::with_workers(4)?;
//! let results: Result<Vec<i32>, String> = executor.try_execute_all(vec![1, 2, 3], |x| Ok(x * 2));
//! assert_eq!(results?, vec![2, 4, 6]);
//! ```

#[cfg(feature = "rayon")]
mod rayon_executor;

#[cfg(feature = "rayon")]
pub use rayon_executor::RayonExecutor;

pub use peel_traits::{Executor, ExecutorError, SyncExecutor};

/// A type-erased executor that wraps concrete executor implementations.
///
/// Since the `Executor` trait has generic methods, it cannot be used as a trait object
/// (`dyn Executor`). This enum holds the concrete executor types and delegates to them.
#[derive(Clone, Debug)]
pub enum ExecutorImpl {
    /// Sequential executor (no parallelism)
    Sync(SyncExecutor),

    /// Rayon thread pool executor
    #[cfg(feature = "rayon")]
    Rayon(RayonExecutor),
}

impl ExecutorImpl {
    /// Picks an executor for `workers` concurrent pages.
    ///
    /// One worker (or a build without the `rayon` feature) runs sequentially.
    pub fn with_workers(workers: usize) -> Result<Self, ExecutorError> {
        if workers <= 1 {
            return Ok(ExecutorImpl::Sync(SyncExecutor::new()));
        }
        #[cfg(feature = "rayon")]
        {
            Ok(ExecutorImpl::Rayon(RayonExecutor::with_threads(workers)?))
        }
        #[cfg(not(feature = "rayon"))]
        {
            log::debug!("rayon support disabled; running {} workers sequentially", workers);
            Ok(ExecutorImpl::Sync(SyncExecutor::new()))
        }
    }
}

impl Executor for ExecutorImpl {
    fn try_execute_all<T, R, E, F>(&self, items: Vec<T>, f: F) -> Result<Vec<R>, E>
    where
        T: Send + 'static,
        R: Send + 'static,
        E: Send + 'static,
        F: Fn(T) -> Result<R, E> + Send + Sync + Clone + 'static,
    {
        match self {
            ExecutorImpl::Sync(exec) => exec.try_execute_all(items, f),
            #[cfg(feature = "rayon")]
            ExecutorImpl::Rayon(exec) => exec.try_execute_all(items, f),
        }
    }

    fn parallelism(&self) -> usize {
        match self {
            ExecutorImpl::Sync(exec) => exec.parallelism(),
            #[cfg(feature = "rayon")]
            ExecutorImpl::Rayon(exec) => exec.parallelism(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ExecutorImpl::Sync(exec) => exec.name(),
            #[cfg(feature = "rayon")]
            ExecutorImpl::Rayon(exec) => exec.name(),
        }
    }
}

impl Default for ExecutorImpl {
    fn default() -> Self {
        ExecutorImpl::Sync(SyncExecutor::new())
    }
}
