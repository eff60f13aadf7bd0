//! Instance-scoped pool counters.
//!
//! Counters live on the dispatcher and its workers rather than in
//! process-global state, so independent pools report independently.

use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time snapshot of a dispatcher's counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherStats {
    /// Jobs accepted by `submit_job`.
    pub submitted: u64,
    /// Jobs fully processed across the pool.
    pub processed: u64,
    /// Processed counts per worker, in worker-creation order.
    pub per_worker: Vec<u64>,
}

/// Processed-job counter shared between a worker handle and its loop task.
#[derive(Debug, Default)]
pub(crate) struct WorkerStats {
    processed: AtomicU64,
}

impl WorkerStats {
    pub(crate) fn record_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }
}
