//! Load driver for the sharded matching engine
//!
//! Builds the engine from a JSON config, floods it with synthetic orders
//! from throttled producer threads, prints per-partition throughput once a
//! second, then shuts down and reports final statistics.

mod config;
mod flow;

use anyhow::Result;
use clap::Parser;
use config::LoadConfig;
use flow::OrderFlow;
use matching_engine::partition::PartitionConfig;
use matching_engine::MatchingEngine;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use types::errors::RouteError;

#[derive(Debug, Parser)]
#[command(name = "loadgen", about = "Synthetic order load driver")]
struct Args {
    /// Path to a JSON config; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the aggregate orders-per-second target
    #[arg(long)]
    rate: Option<u64>,

    /// Override the run duration in seconds
    #[arg(long)]
    duration: Option<u64>,

    /// Override the RNG seed
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => LoadConfig::from_file(path)?,
        None => LoadConfig::default(),
    };
    if let Some(rate) = args.rate {
        config.orders_per_second = rate;
    }
    if let Some(duration) = args.duration {
        config.duration_secs = duration;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.validate()?;

    let layout = config.partition_layout();
    info!(
        symbols = config.symbols.len(),
        partitions = layout.len(),
        rate = config.orders_per_second,
        duration_secs = config.duration_secs,
        "starting load"
    );

    let engine = Arc::new(MatchingEngine::new(
        layout,
        &PartitionConfig {
            workers: config.workers_per_partition,
            queue_capacity: None,
        },
    )?);

    let produced = Arc::new(AtomicU64::new(0));
    let stop = Arc::new(AtomicBool::new(false));
    let started = Instant::now();

    // Producers split the aggregate rate evenly.
    let per_producer_rate = (config.orders_per_second / config.producers as u64).max(1);
    let producers: Vec<_> = (0..config.producers)
        .map(|i| {
            let engine = Arc::clone(&engine);
            let produced = Arc::clone(&produced);
            let stop = Arc::clone(&stop);
            let mut flow = OrderFlow::new(&config.symbols, config.seed + i as u64);
            let period = Duration::from_nanos(1_000_000_000 / per_producer_rate);
            thread::Builder::new()
                .name(format!("producer-{i}"))
                .spawn(move || {
                    while !stop.load(Ordering::Acquire) {
                        let order = flow.next_order();
                        match engine.route(order.symbol, order.side, order.price, order.quantity) {
                            Ok(_) => {
                                produced.fetch_add(1, Ordering::Relaxed);
                            }
                            Err(RouteError::PartitionShutDown { .. }) => break,
                            Err(err) => warn!(%err, "order not routed"),
                        }
                        thread::sleep(period);
                    }
                })
                .expect("failed to spawn producer")
        })
        .collect();

    // Monitor: print throughput once a second until the run ends.
    let deadline = started + Duration::from_secs(config.duration_secs);
    while Instant::now() < deadline {
        thread::sleep(Duration::from_secs(1));
        let elapsed = started.elapsed().as_secs_f64();
        let stats = engine.stats();
        let total_produced = produced.load(Ordering::Relaxed);

        info!(
            produced = total_produced,
            produced_per_sec = %format!("{:.1}", total_produced as f64 / elapsed),
            trades_per_sec = %format!("{:.1}", stats.total_trades as f64 / elapsed),
            "throughput"
        );
        for partition in &stats.partitions {
            info!(
                partition = %partition.name,
                orders_read = partition.orders_read,
                total_trades = partition.total_trades,
                "partition"
            );
        }
    }

    stop.store(true, Ordering::Release);
    for producer in producers {
        if producer.join().is_err() {
            warn!("producer panicked");
        }
    }

    // Let the queues drain before tearing the partitions down.
    let target = produced.load(Ordering::Relaxed);
    while engine.stats().orders_read < target {
        thread::sleep(Duration::from_millis(10));
    }
    engine.shutdown();

    let stats = engine.stats();
    let elapsed = started.elapsed().as_secs_f64();
    info!(
        produced = produced.load(Ordering::Relaxed),
        orders_read = stats.orders_read,
        total_trades = stats.total_trades,
        elapsed_secs = %format!("{elapsed:.1}"),
        "final statistics"
    );
    for partition in &stats.partitions {
        info!(
            partition = %partition.name,
            orders_read = partition.orders_read,
            total_trades = partition.total_trades,
            "partition final"
        );
    }

    let mut resting_orders = 0usize;
    let mut resting_quantity = 0u64;
    for snapshot in engine.snapshot_resting() {
        resting_orders += snapshot
            .bids
            .iter()
            .chain(snapshot.asks.iter())
            .map(|level| level.orders.len())
            .sum::<usize>();
        resting_quantity += snapshot.resting_quantity();
    }
    info!(resting_orders, resting_quantity, "remaining liquidity");

    Ok(())
}
