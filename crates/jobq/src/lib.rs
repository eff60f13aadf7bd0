#![doc = include_str!("../README.md")]

mod pool;
mod stats;

pub use jobq_core::{Error, Job, Result};
pub use pool::{Dispatcher, Worker};
pub use stats::DispatcherStats;
