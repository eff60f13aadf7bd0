use clap::Parser;

/// Runtime configuration for the `jobq` demo binary.
///
/// Everything is an explicit CLI argument; the dispatcher takes no
/// configuration from the environment.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "jobq",
    version,
    about = "Bounded-queue job dispatch demo with a round-robin worker pool"
)]
pub struct CliArgs {
    /// Number of worker tasks processing jobs concurrently.
    ///
    /// Each worker owns a single-slot inbox and processes one job at a
    /// time. Values below 1 are rejected at startup.
    #[arg(long, default_value_t = 3)]
    pub workers: i64,

    /// Capacity of the shared job queue.
    ///
    /// Submissions beyond this capacity are rejected immediately rather
    /// than blocking the submitter. Negative values degrade to a queue
    /// that accepts nothing.
    #[arg(long, default_value_t = 10)]
    pub queue_capacity: i64,

    /// Number of demo jobs to submit before shutting down.
    #[arg(long, default_value_t = 8)]
    pub jobs: i64,
}
