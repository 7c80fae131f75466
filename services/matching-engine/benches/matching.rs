//! Book matching throughput benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use matching_engine::book::OrderBook;
use types::ids::{OrderIdGenerator, Symbol};
use types::numeric::Price;
use types::order::{Order, Side};

/// Alternating maker/taker flow around a fixed mid, deterministic.
fn order_stream(count: usize) -> Vec<Order> {
    let ids = OrderIdGenerator::new();
    let symbol = Symbol::new("AAA");
    (0..count)
        .map(|i| {
            let side = if i % 2 == 0 { Side::SELL } else { Side::BUY };
            let offset = (i % 7) as i64 - 3;
            Order::new(
                ids.next_id(),
                symbol.clone(),
                side,
                Price::from_ticks(2000 + offset),
                (i % 50 + 1) as u64,
                0,
            )
        })
        .collect()
}

fn bench_process(c: &mut Criterion) {
    c.bench_function("book_process_10k", |b| {
        let orders = order_stream(10_000);
        b.iter(|| {
            let mut book = OrderBook::new(Symbol::new("AAA"));
            for order in orders.iter().cloned() {
                book.process(black_box(order));
            }
            black_box(book.total_trades())
        });
    });

    c.bench_function("book_resting_insert_1k", |b| {
        // Non-crossing ladder: pure insertion path.
        let ids = OrderIdGenerator::new();
        let orders: Vec<Order> = (0..1_000)
            .map(|i| {
                Order::new(
                    ids.next_id(),
                    Symbol::new("AAA"),
                    Side::BUY,
                    Price::from_ticks(2000 - (i % 100) as i64),
                    10,
                    0,
                )
            })
            .collect();
        b.iter(|| {
            let mut book = OrderBook::new(Symbol::new("AAA"));
            for order in orders.iter().cloned() {
                book.process(black_box(order));
            }
            black_box(book.snapshot_resting().resting_quantity())
        });
    });
}

criterion_group!(benches, bench_process);
criterion_main!(benches);
