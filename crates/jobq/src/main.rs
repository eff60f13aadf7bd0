mod cli;

use core::time::Duration;

use clap::Parser;
use cli::CliArgs;
use jobq::{Dispatcher, Job};
use tokio::signal;
use tracing_subscriber::EnvFilter;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut dispatcher = Dispatcher::new(args.workers, args.queue_capacity);
    dispatcher.start()?;

    tracing::info!("Submitting {} jobs", args.jobs);
    for i in 1..=args.jobs {
        let job = Job::new(i, format!("Task-{i}"));
        if let Err(err) = dispatcher.submit_job(job) {
            tracing::warn!("Failed to submit job: {err}");
        }
    }

    tracing::info!("Processing jobs");
    tokio::select! {
        () = tokio::time::sleep(Duration::from_secs(2)) => {}
        _ = signal::ctrl_c() => {
            tracing::info!("Interrupted, shutting down early");
        }
    }

    dispatcher.stop().await?;

    let stats = dispatcher.stats();
    tracing::info!(
        "Processed {}/{} submitted jobs",
        stats.processed,
        stats.submitted
    );
    Ok(())
}
