//! The dispatcher: bounded queue, worker pool, and the distribution loop.
//!
//! The [`Dispatcher`] is the single owner of the pool. Callers submit jobs
//! through a non-blocking bounded queue; a background loop drains the queue
//! and hands each job to a worker chosen by strict round-robin. Shutdown
//! stops workers sequentially in creation order and then joins the pool.

use std::sync::atomic::{AtomicU64, Ordering};

use jobq_core::{Error, Job, Result};
use tokio::sync::mpsc;
use tokio_util::task::TaskTracker;

use crate::pool::worker::Worker;
use crate::stats::DispatcherStats;

/// Explicit lifecycle, checked at entry to `start`, `stop`, and
/// `submit_job` so misuse fails fast instead of deadlocking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Configured,
    Running,
    Stopped,
}

/// Coordinator owning the job queue and a fixed pool of workers.
///
/// The pool size and queue capacity are fixed at construction; `start`
/// populates the pool and launches the distribution loop, and the pool is
/// never resized afterwards. A dispatcher runs at most once: once stopped it
/// cannot be restarted, and a fresh instance must be constructed instead.
///
/// Dropping a running dispatcher closes its channels, which ends the
/// distribution loop and every worker loop without any processing guarantee
/// for jobs still queued.
#[derive(Debug)]
pub struct Dispatcher {
    max_workers: usize,
    queue_capacity: usize,
    queue_tx: Option<mpsc::Sender<Job>>,
    queue_rx: Option<mpsc::Receiver<Job>>,
    workers: Vec<Worker>,
    tracker: TaskTracker,
    submitted: AtomicU64,
    state: State,
}

impl Dispatcher {
    /// Creates a dispatcher with the given pool size and queue capacity.
    ///
    /// Negative inputs are clamped to zero rather than rejected; the zero
    /// cases surface later as a `start` failure (no workers) or as a queue
    /// that accepts nothing. Allocation only; no task is spawned.
    pub fn new(max_workers: i64, queue_capacity: i64) -> Self {
        let max_workers = usize::try_from(max_workers).unwrap_or(0);
        let queue_capacity = usize::try_from(queue_capacity).unwrap_or(0);

        // Tokio channels cannot be zero-sized; a requested capacity of zero
        // keeps a minimal channel and rejects every submission up front.
        let (queue_tx, queue_rx) = mpsc::channel(queue_capacity.max(1));

        Self {
            max_workers,
            queue_capacity,
            queue_tx: Some(queue_tx),
            queue_rx: Some(queue_rx),
            workers: Vec::with_capacity(max_workers),
            tracker: TaskTracker::new(),
            submitted: AtomicU64::new(0),
            state: State::Configured,
        }
    }

    /// The configured maximum pool size.
    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// The fixed capacity of the job queue.
    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Workers currently in the pool: zero before `start`, exactly
    /// `max_workers` after.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Populates the worker pool and launches the distribution loop.
    /// Returns immediately; must be called from within a Tokio runtime.
    ///
    /// Workers get sequential ids starting at 1 and are started in order.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Configuration`] when the effective worker count
    /// is zero (including clamped negative input), and with
    /// [`Error::AlreadyStarted`] once `start` has been called, whether the
    /// dispatcher is still running or already stopped.
    pub fn start(&mut self) -> Result<()> {
        if self.state != State::Configured {
            return Err(Error::AlreadyStarted);
        }
        if self.max_workers == 0 {
            return Err(Error::Configuration {
                reason: "max_workers must be greater than 0".to_string(),
            });
        }
        let Some(queue_rx) = self.queue_rx.take() else {
            return Err(Error::AlreadyStarted);
        };

        tracing::info!("Starting dispatcher with {} workers", self.max_workers);

        for id in 1..=self.max_workers {
            let mut worker = Worker::new(id, self.tracker.clone());
            worker.start()?;
            self.workers.push(worker);
        }

        let senders: Vec<(usize, mpsc::Sender<Job>)> = self
            .workers
            .iter()
            .map(|worker| (worker.id(), worker.job_sender()))
            .collect();
        tokio::spawn(dispatch_loop(queue_rx, senders));

        // Nothing registers with the join after startup; closing here lets
        // `wait` complete once every worker has exited.
        self.tracker.close();
        self.state = State::Running;
        Ok(())
    }

    /// Submits a job to the queue without blocking.
    ///
    /// On success the job is owned by the queue until the distribution loop
    /// claims it. Submissions before `start` are accepted and sit in the
    /// queue until the loop comes up.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::QueueFull`] — handing the job back — when the
    /// queue is at capacity at the instant of the attempt, and with
    /// [`Error::NotRunning`] after `stop`.
    pub fn submit_job(&self, job: Job) -> Result<()> {
        if self.state == State::Stopped {
            return Err(Error::NotRunning);
        }
        if self.queue_capacity == 0 {
            return Err(Error::QueueFull(job));
        }
        let Some(queue_tx) = self.queue_tx.as_ref() else {
            return Err(Error::NotRunning);
        };

        let job_id = job.id();
        match queue_tx.try_send(job) {
            Ok(()) => {
                self.submitted.fetch_add(1, Ordering::Relaxed);
                tracing::info!("Submitted job {job_id} to the queue");
                Ok(())
            }
            Err(mpsc::error::TrySendError::Full(job)) => Err(Error::QueueFull(job)),
            Err(mpsc::error::TrySendError::Closed(job)) => Err(Error::Channel {
                context: format!("job queue closed, cannot submit {job}"),
            }),
        }
    }

    /// Gracefully shuts down the pool.
    ///
    /// Rejects new submissions, then stops workers sequentially in creation
    /// order — each stop blocking until that worker has finished its
    /// in-flight job, drained its inbox, and acknowledged — and finally
    /// joins the pool. The wall-clock cost is the sum of the per-worker
    /// waits, not their maximum. Jobs still in the shared queue are not
    /// processed; the draining loop logs each as dropped.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NotRunning`] unless the dispatcher is currently
    /// running (second calls included). A worker that fails to stop is
    /// logged and shutdown proceeds to the rest of the pool.
    pub async fn stop(&mut self) -> Result<()> {
        if self.state != State::Running {
            return Err(Error::NotRunning);
        }
        // Reject new submissions before the first worker goes down.
        self.state = State::Stopped;

        tracing::info!("Stopping dispatcher");

        for worker in &self.workers {
            if let Err(err) = worker.stop().await {
                tracing::error!("Worker {} failed to stop: {err}", worker.id());
            }
        }

        // Redundant with the sequential acknowledgements above, but joins
        // any worker whose exit has not yet propagated.
        self.tracker.wait().await;

        // Dropping the queue sender lets the distribution loop drain and
        // exit.
        self.queue_tx = None;

        tracing::info!("All workers stopped");
        Ok(())
    }

    /// Blocks until every worker has exited, without signaling any quit.
    ///
    /// Intended for callers that want to block behind a `stop` issued
    /// elsewhere. Workers only exit via quit signals, so calling this
    /// without a prior `stop` blocks forever.
    pub async fn wait(&self) {
        self.tracker.wait().await;
    }

    /// Point-in-time snapshot of the pool's counters.
    pub fn stats(&self) -> DispatcherStats {
        let per_worker: Vec<u64> = self.workers.iter().map(Worker::jobs_processed).collect();
        DispatcherStats {
            submitted: self.submitted.load(Ordering::Relaxed),
            processed: per_worker.iter().sum(),
            per_worker,
        }
    }
}

/// Moves jobs from the queue to workers until the queue closes.
///
/// Jobs are dequeued in FIFO order and assigned by strict round-robin: a
/// monotonic counter modulo the pool size, advanced exactly once per
/// dispatched job, decided at dequeue time. Each hand-off runs in its own
/// ephemeral task: the inbound channel holds a single job, so the send parks
/// until the worker is free, and spawning keeps one slow worker from
/// stalling dispatch for the rest of the pool. Delivery order across
/// workers is therefore not guaranteed to match assignment order.
pub(crate) async fn dispatch_loop(
    mut queue: mpsc::Receiver<Job>,
    workers: Vec<(usize, mpsc::Sender<Job>)>,
) {
    let mut next_worker: usize = 0;

    while let Some(job) = queue.recv().await {
        // Only reachable if the pool somehow came up empty; `start` refuses
        // that configuration.
        if workers.is_empty() {
            tracing::warn!("No workers available, dropping {job}");
            continue;
        }

        let (worker_id, sender) = &workers[next_worker % workers.len()];
        next_worker = next_worker.wrapping_add(1);

        let worker_id = *worker_id;
        let sender = sender.clone();
        tokio::spawn(async move {
            if let Err(err) = sender.send(job).await {
                tracing::warn!("Worker {worker_id} inbox closed, dropping {}", err.0);
            }
        });
    }

    tracing::debug!("Job queue closed, dispatch loop exiting");
}
