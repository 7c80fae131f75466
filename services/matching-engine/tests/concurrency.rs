//! Concurrency tests
//!
//! Verifies that partitions match in parallel without interference, that
//! quantity is conserved under multi-producer load, and that per-symbol
//! FIFO holds end-to-end from a single producer.

use matching_engine::partition::{PartitionConfig, PartitionSpec};
use matching_engine::MatchingEngine;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use types::ids::Symbol;
use types::numeric::Price;
use types::order::Side;

fn wait_until_read(engine: &MatchingEngine, n: u64) {
    let mut spins = 0;
    while engine.stats().orders_read < n {
        assert!(spins < 30_000, "engine never drained");
        spins += 1;
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn concurrent_partitions_do_not_interfere() {
    let symbols = ["AAA", "BBB", "CCC", "DDD"];
    let layout = symbols
        .iter()
        .enumerate()
        .map(|(i, s)| PartitionSpec {
            name: format!("Partition-{}", i + 1),
            symbols: vec![Symbol::new(s)],
        })
        .collect();
    let engine = Arc::new(MatchingEngine::new(layout, &PartitionConfig::default()).unwrap());

    // One producer per symbol: 500 matched pairs each.
    let handles: Vec<_> = symbols
        .iter()
        .map(|s| {
            let engine = Arc::clone(&engine);
            let symbol = Symbol::new(s);
            thread::spawn(move || {
                for _ in 0..500 {
                    engine
                        .route(symbol.clone(), Side::SELL, Price::from_u64(50), 1)
                        .unwrap();
                    engine
                        .route(symbol.clone(), Side::BUY, Price::from_u64(50), 1)
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    wait_until_read(&engine, 4000);
    engine.shutdown();

    let stats = engine.stats();
    assert_eq!(stats.orders_read, 4000);
    assert_eq!(stats.total_trades, 2000);
    for partition in &stats.partitions {
        assert_eq!(partition.orders_read, 1000);
        assert_eq!(partition.total_trades, 500);
    }

    // Everything matched; nothing rests.
    for snapshot in engine.snapshot_resting() {
        assert_eq!(snapshot.resting_quantity(), 0);
    }
}

#[test]
fn conservation_of_quantity_under_load() {
    // All sells at one price, all buys at the same price, equal totals:
    // whatever interleaving the workers see, resting + matched must balance.
    let layout = vec![PartitionSpec {
        name: "P1".to_string(),
        symbols: vec![Symbol::new("AAA"), Symbol::new("BBB")],
    }];
    let engine = Arc::new(MatchingEngine::new(layout, &PartitionConfig::default()).unwrap());

    let producers: Vec<_> = (0..4)
        .map(|i| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let symbol = Symbol::new(if i % 2 == 0 { "AAA" } else { "BBB" });
                let side = if i < 2 { Side::SELL } else { Side::BUY };
                for q in 1..=250u64 {
                    engine
                        .route(symbol.clone(), side, Price::from_u64(100), q % 10 + 1)
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in producers {
        handle.join().unwrap();
    }

    wait_until_read(&engine, 1000);
    engine.shutdown();

    // Per symbol: sell total == buy total, both sides drawn at one price, so
    // submitted = resting + 2 × matched.
    let submitted_per_symbol: u64 = (1..=250u64).map(|q| q % 10 + 1).sum::<u64>() * 2;
    let stats = engine.stats();
    for snapshot in engine.snapshot_resting() {
        let book_stats = stats.partitions[0]
            .books
            .iter()
            .find(|b| b.symbol == snapshot.symbol)
            .unwrap();
        let matched_both_sides: u64 = submitted_per_symbol - snapshot.resting_quantity();
        assert_eq!(
            matched_both_sides % 2,
            0,
            "matched quantity must debit both sides equally"
        );
        assert!(book_stats.total_orders == 500);
    }
}

#[test]
fn single_producer_per_symbol_fifo() {
    let layout = vec![PartitionSpec {
        name: "P1".to_string(),
        symbols: vec![Symbol::new("AAA")],
    }];
    let engine = MatchingEngine::new(layout, &PartitionConfig::default()).unwrap();

    // Strictly descending bid prices from one producer: no crosses, and the
    // resting ladder must reproduce submission order exactly.
    let mut expected = Vec::new();
    for i in 0..100u64 {
        let price = Price::from_ticks(10_000 - i as i64);
        let id = engine
            .route(Symbol::new("AAA"), Side::BUY, price, 1)
            .unwrap();
        expected.push((price, id));
    }

    wait_until_read(&engine, 100);
    engine.shutdown();

    let snapshots = engine.snapshot_resting();
    let aaa = &snapshots[0];
    assert_eq!(aaa.bids.len(), 100);
    for (level, (price, id)) in aaa.bids.iter().zip(expected.iter()) {
        assert_eq!(level.price, *price);
        assert_eq!(level.orders[0].order_id, *id);
    }
}

#[test]
fn counters_readable_while_running() {
    let layout = vec![PartitionSpec {
        name: "P1".to_string(),
        symbols: vec![Symbol::new("AAA")],
    }];
    let engine = Arc::new(MatchingEngine::new(layout, &PartitionConfig::default()).unwrap());

    let producer = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            for _ in 0..1000 {
                engine
                    .route(Symbol::new("AAA"), Side::BUY, Price::from_u64(10), 1)
                    .unwrap();
                engine
                    .route(Symbol::new("AAA"), Side::SELL, Price::from_u64(10), 1)
                    .unwrap();
            }
        })
    };

    // Poll while the producer runs; totals must be monotonic.
    let mut last_trades = 0;
    for _ in 0..50 {
        let stats = engine.stats();
        assert!(stats.total_trades >= last_trades, "trade counter regressed");
        last_trades = stats.total_trades;
        thread::sleep(Duration::from_millis(1));
    }

    producer.join().unwrap();
    wait_until_read(&engine, 2000);
    engine.shutdown();
    assert_eq!(engine.stats().total_trades, 1000);
}
