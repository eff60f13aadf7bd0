//! Worker lifecycle and job processing.
//!
//! Each worker is a long-running Tokio task that processes jobs one at a
//! time until signaled to stop. The [`Worker`] handle owns the channels and
//! is what the dispatcher keeps in its pool; the loop itself runs detached
//! on the shared [`TaskTracker`].

use core::time::Duration;
use std::sync::Arc;

use jobq_core::{Error, Job, Result};
use tokio::sync::{mpsc, oneshot};
use tokio_util::task::TaskTracker;

use crate::stats::WorkerStats;

/// Simulated cost of processing a single job. Jobs carry no real semantics;
/// processing is a fixed sleep.
pub(crate) const SIMULATED_WORK: Duration = Duration::from_millis(100);

/// A concurrent execution unit that processes jobs sequentially.
///
/// The inbound channel holds a single job, so at most one job is in flight
/// to a worker at a time: a hand-off to a busy worker parks until the worker
/// returns to its wait point. The quit channel carries a oneshot sender the
/// loop uses to acknowledge its exit.
///
/// Workers are normally created, started, and stopped by their
/// [`Dispatcher`](crate::Dispatcher); they can be constructed directly, but a
/// worker is never restarted after it stops.
#[derive(Debug)]
pub struct Worker {
    id: usize,
    job_tx: mpsc::Sender<Job>,
    quit_tx: mpsc::Sender<oneshot::Sender<()>>,
    job_rx: Option<mpsc::Receiver<Job>>,
    quit_rx: Option<mpsc::Receiver<oneshot::Sender<()>>>,
    stats: Arc<WorkerStats>,
    tracker: TaskTracker,
}

impl Worker {
    /// Creates a new worker with the given id, registered against the shared
    /// completion join. Allocates channels only; no task is spawned.
    pub fn new(id: usize, tracker: TaskTracker) -> Self {
        let (job_tx, job_rx) = mpsc::channel(1);
        let (quit_tx, quit_rx) = mpsc::channel(1);

        Self {
            id,
            job_tx,
            quit_tx,
            job_rx: Some(job_rx),
            quit_rx: Some(quit_rx),
            stats: Arc::new(WorkerStats::default()),
            tracker,
        }
    }

    /// This worker's id. Assigned by the dispatcher, 1-based and sequential.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Jobs this worker has fully processed.
    pub fn jobs_processed(&self) -> u64 {
        self.stats.processed()
    }

    /// Registers the processing loop with the completion join and launches
    /// it. Returns immediately; must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::AlreadyStarted`] on a second call: a worker runs
    /// exactly one loop for its lifetime.
    pub fn start(&mut self) -> Result<()> {
        let (jobs, quit) = match (self.job_rx.take(), self.quit_rx.take()) {
            (Some(jobs), Some(quit)) => (jobs, quit),
            _ => return Err(Error::AlreadyStarted),
        };

        self.tracker
            .spawn(worker_loop(self.id, jobs, quit, Arc::clone(&self.stats)));
        Ok(())
    }

    /// Signals the worker to quit and waits for the acknowledgement.
    ///
    /// Returns once the loop has exited. If the worker is mid-job when the
    /// signal is sent, this blocks until that job (and anything already
    /// handed off) finishes.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NotRunning`] before `start`, and with
    /// [`Error::Channel`] if the loop has already exited (the quit channel
    /// has no receiver left).
    pub async fn stop(&self) -> Result<()> {
        if self.job_rx.is_some() {
            return Err(Error::NotRunning);
        }

        let (ack_tx, ack_rx) = oneshot::channel();
        self.quit_tx.send(ack_tx).await.map_err(|_| Error::Channel {
            context: format!("worker {} quit channel closed", self.id),
        })?;

        ack_rx.await.map_err(|_| Error::Channel {
            context: format!("worker {} exited without acknowledging quit", self.id),
        })
    }

    /// A sender for this worker's inbound job channel, used by the
    /// distribution loop for hand-offs.
    pub(crate) fn job_sender(&self) -> mpsc::Sender<Job> {
        self.job_tx.clone()
    }
}

/// A single worker's processing loop.
///
/// Waits on two events with no ordering preference: an incoming job, which
/// is processed to completion before returning to the wait point, or a quit
/// signal, which ends the loop. A job already handed off (buffered in the
/// inbound channel) when the quit arrives is still processed before the exit
/// is acknowledged. A closed channel on either side also ends the loop.
async fn worker_loop(
    worker_id: usize,
    mut jobs: mpsc::Receiver<Job>,
    mut quit: mpsc::Receiver<oneshot::Sender<()>>,
    stats: Arc<WorkerStats>,
) {
    tracing::debug!("Worker {worker_id} started");

    loop {
        tokio::select! {
            job = jobs.recv() => match job {
                Some(job) => process_job(worker_id, job, &stats).await,
                None => {
                    tracing::debug!("Worker {worker_id} job channel closed");
                    break;
                }
            },
            signal = quit.recv() => {
                // Finish what was already handed off before honoring the quit.
                while let Ok(job) = jobs.try_recv() {
                    process_job(worker_id, job, &stats).await;
                }

                match signal {
                    Some(ack) => {
                        tracing::debug!("Worker {worker_id} received quit signal");
                        if ack.send(()).is_err() {
                            tracing::error!("Worker {worker_id} failed to acknowledge quit");
                        }
                    }
                    None => tracing::debug!("Worker {worker_id} quit channel closed"),
                }
                break;
            }
        }
    }

    tracing::debug!("Worker {worker_id} stopped");
}

/// Processes one job to completion: a fixed-duration sleep standing in for
/// real work, plus the instrumented counter.
async fn process_job(worker_id: usize, job: Job, stats: &WorkerStats) {
    tracing::info!("Worker {worker_id} processing {job}");
    tokio::time::sleep(SIMULATED_WORK).await;
    stats.record_processed();
    tracing::info!("Worker {worker_id} completed {job}");
}
