//! Error types for the job dispatch pool.
//!
//! This module defines the central `Error` enum, which captures all
//! recoverable and reportable error cases within the dispatch system.
//!
//! ## Error Cases
//! - `Configuration`: The dispatcher was asked to start with settings it
//!   cannot run with (an effective worker count of zero).
//! - `QueueFull`: A non-blocking submission found the job queue at capacity.
//! - `Channel`: An internal communication failure between tasks or workers.
//! - `AlreadyStarted` / `NotRunning`: Lifecycle misuse, reported immediately
//!   instead of deadlocking the caller.

use crate::common::job::Job;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the job dispatch pool.
#[derive(Clone, thiserror::Error, Debug)]
pub enum Error {
    /// The dispatcher cannot start with the configured settings.
    #[error("invalid configuration: {reason}")]
    Configuration { reason: String },

    /// The job queue was at capacity at the instant of a non-blocking
    /// submission. The rejected job is handed back so the caller can retry,
    /// drop it, or apply its own backpressure policy.
    #[error("job queue is full, cannot submit {0}")]
    QueueFull(Job),

    /// Internal channel send/receive failure (e.g., a closed peer).
    #[error("channel error: {context}")]
    Channel { context: String },

    /// `start` was called on a component that is already running.
    #[error("already started")]
    AlreadyStarted,

    /// The operation requires a running component (`stop` before `start`,
    /// a second `stop`, or a submission after shutdown).
    #[error("not running")]
    NotRunning,
}
