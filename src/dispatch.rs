//! Task Dispatch
//!
//! The unit of work and the dispatcher abstraction behind which the local
//! thread pool and the distributed cluster are interchangeable. The
//! partition/sort/merge pipeline is written once against [`Dispatch`]; only
//! the execution mechanism differs between implementations.

use rayon::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::radix::radix_sort;

/// Sort one partition and hand it back.
///
/// This is the whole unit of work a worker executes. It owns its input and
/// shares nothing with sibling tasks, which is what makes it safe to run on
/// another thread, process, or machine with no synchronization beyond
/// dispatch and collection.
pub fn sort_task(mut partition: Vec<u64>) -> Vec<u64> {
    radix_sort(&mut partition);
    partition
}

/// Executes one [`sort_task`] per partition and returns the sorted runs in
/// partition order.
///
/// Dispatch is fire-all-then-join: every implementation blocks until all
/// tasks have completed, and a single failed task fails the whole call.
/// Partial results are never returned.
pub trait Dispatch {
    /// Number of partitions this dispatcher wants to execute concurrently.
    fn parallelism(&self) -> usize;

    /// Run all tasks to completion. `runs[i]` is the sorted form of
    /// `partitions[i]`.
    fn dispatch(&mut self, partitions: Vec<Vec<u64>>) -> Result<Vec<Vec<u64>>>;
}

/// Local mode: a fixed-size rayon thread pool.
///
/// The pool caps concurrency at `workers` threads; excess partitions queue
/// inside rayon. Each task mutates only its own partition, so no locking is
/// involved anywhere.
pub struct LocalPoolDispatcher {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl LocalPoolDispatcher {
    pub fn new(workers: usize) -> Result<Self> {
        let workers = workers.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()?;
        Ok(Self { pool, workers })
    }
}

impl Dispatch for LocalPoolDispatcher {
    fn parallelism(&self) -> usize {
        self.workers
    }

    fn dispatch(&mut self, partitions: Vec<Vec<u64>>) -> Result<Vec<Vec<u64>>> {
        debug!(
            tasks = partitions.len(),
            workers = self.workers,
            "dispatching to local pool"
        );
        let runs = self
            .pool
            .install(|| partitions.into_par_iter().map(sort_task).collect());
        Ok(runs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radix::is_sorted;

    #[test]
    fn test_sort_task_sorts_its_partition() {
        let run = sort_task(vec![170, 45, 75, 90]);
        assert_eq!(run, vec![45, 75, 90, 170]);
    }

    #[test]
    fn test_sort_task_empty() {
        assert!(sort_task(vec![]).is_empty());
    }

    #[test]
    fn test_local_pool_preserves_partition_order() {
        let mut dispatcher = LocalPoolDispatcher::new(4).unwrap();
        let partitions = vec![vec![9, 1], vec![8, 2], vec![7, 3], vec![6, 4]];
        let runs = dispatcher.dispatch(partitions).unwrap();
        assert_eq!(runs, vec![vec![1, 9], vec![2, 8], vec![3, 7], vec![4, 6]]);
    }

    #[test]
    fn test_local_pool_more_tasks_than_workers() {
        // Excess partitions queue inside the pool; all still complete.
        let mut dispatcher = LocalPoolDispatcher::new(2).unwrap();
        let partitions: Vec<Vec<u64>> = (0..16).map(|i| vec![100 - i, i]).collect();
        let runs = dispatcher.dispatch(partitions).unwrap();
        assert_eq!(runs.len(), 16);
        assert!(runs.iter().all(|r| is_sorted(r)));
    }

    #[test]
    fn test_local_pool_zero_workers_clamps_to_one() {
        let dispatcher = LocalPoolDispatcher::new(0).unwrap();
        assert_eq!(dispatcher.parallelism(), 1);
    }
}
