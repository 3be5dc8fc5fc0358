//! Parallel and Distributed LSD Radix Sort
//!
//! This crate sorts large arrays of non-negative integers with
//! least-significant-digit radix sort and compares three execution
//! strategies:
//! - **Sequential**: a single-threaded baseline ([`radix::radix_sort`])
//! - **Parallel**: partitions sorted on a local fixed-size thread pool
//! - **Distributed**: partitions scattered to worker processes over TCP and
//!   gathered back to a coordinator
//!
//! The parallel and distributed variants share one pipeline (partition,
//! dispatch one sort task per partition, k-way merge the sorted runs)
//! behind the [`dispatch::Dispatch`] trait; only the execution mechanism
//! differs. The `radix-sorting` binary benchmarks all three and reports
//! wall-clock speedups.

pub mod cluster;
pub mod dispatch;
pub mod error;
pub mod lino_report;
pub mod merge;
pub mod parallel;
pub mod partition;
pub mod radix;

pub use dispatch::{Dispatch, LocalPoolDispatcher};
pub use error::{Result, SortError};
pub use parallel::ParallelSorter;
