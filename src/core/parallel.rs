//! Parallel processing utilities

use crate::error::{Result, TfdepsError};
use parking_lot::Mutex;
use rayon::prelude::*;

/// Progress update information for parallel operations
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub current: usize,
    pub total: usize,
    pub message: String,
}

impl ProgressUpdate {
    /// Create a new progress update
    pub fn new(current: usize, total: usize, message: impl Into<String>) -> Self {
        Self {
            current,
            total,
            message: message.into(),
        }
    }
}

/// Number of worker threads used for parallel work
pub fn thread_count() -> usize {
    num_cpus::get().max(1)
}

/// Apply `f` to every item, in parallel on a pool sized by the number of
/// CPUs or sequentially when `parallel` is false.
///
/// Results always come back in input order, so callers get the same output
/// either way. `progress` is called once per finished item; in parallel mode
/// the calls may come from any worker thread.
pub fn process_with_progress<T, F, R, P>(
    items: Vec<T>,
    parallel: bool,
    f: F,
    progress: P,
) -> Result<Vec<R>>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Send + Sync,
    P: Fn(ProgressUpdate) + Send + Sync,
{
    let total = items.len();
    let counter = Mutex::new(0usize);

    let step = |item: T| {
        let result = f(item);

        let mut count = counter.lock();
        *count += 1;
        progress(ProgressUpdate::new(
            *count,
            total,
            format!("Parsed {}/{}", *count, total),
        ));

        result
    };

    if !parallel {
        return Ok(items.into_iter().map(step).collect());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(thread_count())
        .build()
        .map_err(|e| TfdepsError::ParallelExecution {
            message: format!("could not build thread pool: {}", e),
        })?;

    Ok(pool.install(|| items.into_par_iter().map(step).collect()))
}
