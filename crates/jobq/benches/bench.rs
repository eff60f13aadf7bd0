use core::time::Duration;
use std::time::Instant;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use jobq::{Dispatcher, Job};
use tokio::runtime::Builder;

const JOBS_PER_BATCH: i64 = 32;

fn submit_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool/submit");
    group.throughput(Throughput::Elements(JOBS_PER_BATCH as u64));

    group.bench_function(format!("batch/{JOBS_PER_BATCH}"), |b| {
        b.iter_custom(|iters| {
            let mut elapsed = Duration::ZERO;
            for _ in 0..iters {
                // An unstarted dispatcher never drains the queue, so this
                // measures the non-blocking submission path alone.
                let dispatcher = Dispatcher::new(1, JOBS_PER_BATCH);
                let start = Instant::now();
                for i in 1..=JOBS_PER_BATCH {
                    dispatcher
                        .submit_job(Job::new(i, "bench-payload"))
                        .expect("queue sized for the batch");
                }
                elapsed += start.elapsed();
            }
            elapsed
        });
    });

    group.finish();
}

fn dispatch_bench(c: &mut Criterion) {
    let rt = Builder::new_multi_thread().enable_all().build().unwrap();

    for workers in [2_i64, 8] {
        let mut group = c.benchmark_group("pool/dispatch");
        // Every job costs a fixed simulated sleep, so keep samples small.
        group.sample_size(10);
        group.throughput(Throughput::Elements(JOBS_PER_BATCH as u64));

        group.bench_function(format!("workers/{workers}"), |b| {
            b.to_async(&rt).iter_custom(move |iters| async move {
                let mut elapsed = Duration::ZERO;
                for _ in 0..iters {
                    let mut dispatcher = Dispatcher::new(workers, JOBS_PER_BATCH);
                    dispatcher.start().expect("dispatcher starts");

                    let start = Instant::now();
                    for i in 1..=JOBS_PER_BATCH {
                        dispatcher
                            .submit_job(Job::new(i, "bench-payload"))
                            .expect("queue sized for the batch");
                    }
                    while dispatcher.stats().processed < JOBS_PER_BATCH as u64 {
                        tokio::time::sleep(Duration::from_millis(5)).await;
                    }
                    elapsed += start.elapsed();

                    dispatcher.stop().await.expect("dispatcher stops");
                }
                elapsed
            });
        });

        group.finish();
    }
}

criterion_group!(pool_benches, submit_bench, dispatch_bench);
criterion_main!(pool_benches);
