//! Error types for radix-sorting.

use std::io;
use thiserror::Error;

/// Top-level error for sorting, dispatch, and the wire protocol.
#[derive(Error, Debug)]
pub enum SortError {
    /// A dispatched worker terminated abnormally or its connection broke.
    /// The whole operation fails; no partial result is ever returned.
    #[error("worker rank {rank} failed: {source}")]
    Worker {
        rank: usize,
        #[source]
        source: io::Error,
    },

    /// A peer sent a malformed or unexpected frame.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Output failed an external sortedness or multiset check.
    #[error("verification failed: {0}")]
    Verification(String),

    /// Thread pool construction failed.
    #[error("thread pool error: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, SortError>;
