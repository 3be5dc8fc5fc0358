//! Parallel Sort Orchestration
//!
//! Ties partitioning, dispatch, and the k-way merge into one operation.
//! The same pipeline runs in local-pool and distributed mode; only the
//! [`Dispatch`] implementation behind it changes. For every input and every
//! parallelism degree the result equals a plain [`radix_sort`] of the input.
//!
//! [`radix_sort`]: crate::radix::radix_sort

use tracing::debug;

use crate::dispatch::Dispatch;
use crate::error::Result;
use crate::merge::merge_sorted_runs;
use crate::partition::split_even;

/// Partition → dispatch one sort task per partition → merge the runs.
///
/// Owns its dispatcher so one sorter can be reused across inputs; the
/// dispatcher's connections or thread pool survive between calls.
pub struct ParallelSorter<D: Dispatch> {
    dispatcher: D,
}

impl<D: Dispatch> ParallelSorter<D> {
    pub fn new(dispatcher: D) -> Self {
        Self { dispatcher }
    }

    /// Access the dispatcher, e.g. for a cluster barrier before timing.
    pub fn dispatcher_mut(&mut self) -> &mut D {
        &mut self.dispatcher
    }

    /// Consume the sorter and hand the dispatcher back, e.g. to shut a
    /// cluster down cleanly.
    pub fn into_dispatcher(self) -> D {
        self.dispatcher
    }

    /// Sort `data` and return it fully ordered.
    ///
    /// The input is split into up to `parallelism()` owned partitions, all
    /// tasks are dispatched before the single blocking collection point,
    /// and the gathered runs are merged on the calling side. Fails as a
    /// whole if any task fails.
    pub fn sort(&mut self, data: Vec<u64>) -> Result<Vec<u64>> {
        if data.len() <= 1 {
            return Ok(data);
        }

        let partitions = split_even(&data, self.dispatcher.parallelism());
        debug!(
            len = data.len(),
            partitions = partitions.len(),
            "partitioned input"
        );
        drop(data);

        let runs = self.dispatcher.dispatch(partitions)?;
        Ok(merge_sorted_runs(runs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::LocalPoolDispatcher;
    use crate::radix::radix_sort;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn local_sorter(workers: usize) -> ParallelSorter<LocalPoolDispatcher> {
        ParallelSorter::new(LocalPoolDispatcher::new(workers).unwrap())
    }

    #[test]
    fn test_sort_empty() {
        let mut sorter = local_sorter(4);
        assert!(sorter.sort(vec![]).unwrap().is_empty());
    }

    #[test]
    fn test_sort_single() {
        let mut sorter = local_sorter(4);
        assert_eq!(sorter.sort(vec![5]).unwrap(), vec![5]);
    }

    #[test]
    fn test_sort_preserves_duplicates() {
        let mut sorter = local_sorter(2);
        assert_eq!(sorter.sort(vec![5, 3, 3, 1]).unwrap(), vec![1, 3, 3, 5]);
    }

    #[test]
    fn test_sort_matches_sequential_for_all_degrees() {
        let mut rng = StdRng::seed_from_u64(7);
        let data: Vec<u64> = (0..10_000).map(|_| rng.gen_range(0..1_000_000)).collect();

        let mut expected = data.clone();
        radix_sort(&mut expected);

        for workers in [1, 2, 4, 8] {
            let mut sorter = local_sorter(workers);
            let sorted = sorter.sort(data.clone()).unwrap();
            assert_eq!(sorted, expected, "mismatch at p={}", workers);
        }
    }

    #[test]
    fn test_sort_fewer_elements_than_workers() {
        let mut sorter = local_sorter(8);
        assert_eq!(sorter.sort(vec![3, 1, 2]).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_sorter_is_reusable() {
        let mut sorter = local_sorter(4);
        assert_eq!(sorter.sort(vec![2, 1]).unwrap(), vec![1, 2]);
        assert_eq!(sorter.sort(vec![9, 8, 7]).unwrap(), vec![7, 8, 9]);
    }
}
