//! Executor trait for abstracting parallel execution.
//!
//! This trait lets the page analysis stage fan work out without being tied to
//! a specific threading implementation (rayon, std::thread, etc.).

use std::fmt::Debug;
use thiserror::Error;

/// Error type for executor operations.
#[derive(Error, Debug, Clone)]
#[error("Executor error: {message}")]
pub struct ExecutorError {
    pub message: String,
}

impl ExecutorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A trait for executing work items, potentially in parallel.
///
/// # Implementations
///
/// - `SyncExecutor`: Sequential execution, no threading (always available)
/// - `RayonExecutor`: Bounded work-stealing thread pool (peel-executor, feature-gated)
///
/// Results come back in the same order as the input items, regardless of the
/// order in which they complete.
pub trait Executor: Send + Sync + Debug {
    /// Execute a batch of work items, failing the whole batch on the first error.
    ///
    /// Implementations may stop scheduling remaining items once an error is seen.
    /// No partial results are returned.
    fn try_execute_all<T, R, E, F>(&self, items: Vec<T>, f: F) -> Result<Vec<R>, E>
    where
        T: Send + 'static,
        R: Send + 'static,
        E: Send + 'static,
        F: Fn(T) -> Result<R, E> + Send + Sync + Clone + 'static;

    /// Returns the level of parallelism this executor can provide.
    ///
    /// - Returns 1 for sequential executors
    /// - Returns the configured thread count for parallel executors
    fn parallelism(&self) -> usize;

    /// Returns a human-readable name for this executor (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// A synchronous executor that processes items sequentially.
///
/// This is the simplest executor implementation with no threading overhead.
#[derive(Debug, Clone, Default)]
pub struct SyncExecutor;

impl SyncExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Executor for SyncExecutor {
    fn try_execute_all<T, R, E, F>(&self, items: Vec<T>, f: F) -> Result<Vec<R>, E>
    where
        T: Send + 'static,
        R: Send + 'static,
        E: Send + 'static,
        F: Fn(T) -> Result<R, E> + Send + Sync + Clone + 'static,
    {
        // Short-circuits: items after the first failure are never processed.
        items.into_iter().map(f).collect()
    }

    fn parallelism(&self) -> usize {
        1
    }

    fn name(&self) -> &'static str {
        "SyncExecutor"
    }
}
