//! The dispatcher/worker concurrency pair.
//!
//! This module implements the core of the system: a [`Dispatcher`] owning a
//! bounded job queue and a fixed pool of [`Worker`]s, a background
//! distribution loop moving jobs from the queue to workers in round-robin
//! order, and cooperative shutdown that joins every worker without leaking
//! tasks.

pub(crate) mod dispatcher;
pub(crate) mod worker;


pub use dispatcher::Dispatcher;
pub use worker::Worker;
