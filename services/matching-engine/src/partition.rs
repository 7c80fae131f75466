//! Symbol partition with its worker pool
//!
//! A partition owns a fixed, disjoint symbol set and serializes matching per
//! symbol while letting distinct partitions (and distinct sub-shards within
//! one partition) proceed in parallel. Symbols are assigned round-robin, in
//! sorted order, to a pool of OS-thread workers; each worker has its own
//! ingress queue and exclusively owns the books of its sub-shard, so book
//! mutation is single-writer and needs no lock. Per-symbol submission order
//! from a single producer is preserved end-to-end.

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};
use types::errors::RouteError;
use types::ids::Symbol;
use types::order::Order;

use crate::book::{BookSnapshot, OrderBook};
use crate::metrics::{BookCounters, BookStats, PartitionStats};

/// Runtime tuning for a partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionConfig {
    /// Worker threads per partition; capped at the symbol count since each
    /// worker needs at least one book to own
    pub workers: usize,
    /// Ingress queue capacity per worker. `None` means unbounded; with a
    /// bound, `submit` blocks when the queue is full and never drops.
    pub queue_capacity: Option<usize>,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            workers: 5,
            queue_capacity: None,
        }
    }
}

/// Partition layout entry, as supplied by the external configuration loader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionSpec {
    pub name: String,
    pub symbols: Vec<Symbol>,
}

/// A unit of sharding: a disjoint symbol set, its books, and the worker pool
/// that drains submitted orders into them
///
/// Constructed at startup and live until `shutdown`. A partition with zero
/// symbols is allowed and idle.
pub struct Partition {
    name: String,
    symbols: BTreeSet<Symbol>,
    worker_of: HashMap<Symbol, usize>,
    counters: BTreeMap<Symbol, Arc<BookCounters>>,
    senders: Mutex<Vec<Sender<Order>>>,
    handles: Mutex<Vec<JoinHandle<Vec<OrderBook>>>>,
    retired: Mutex<Vec<OrderBook>>,
    running: Arc<AtomicBool>,
    orders_read: Arc<AtomicU64>,
}

impl Partition {
    /// Construct the partition and start its workers
    pub fn new(spec: PartitionSpec, config: &PartitionConfig) -> Self {
        let symbols: BTreeSet<Symbol> = spec.symbols.into_iter().collect();
        let worker_count = if symbols.is_empty() {
            0
        } else {
            config.workers.max(1).min(symbols.len())
        };

        let mut worker_of = HashMap::with_capacity(symbols.len());
        let mut counters = BTreeMap::new();
        let mut shards: Vec<HashMap<Symbol, OrderBook>> =
            (0..worker_count).map(|_| HashMap::new()).collect();

        // Sorted round-robin: deterministic assignment, balanced shards.
        for (i, symbol) in symbols.iter().enumerate() {
            let worker = i % worker_count;
            let shared = Arc::new(BookCounters::new());
            counters.insert(symbol.clone(), Arc::clone(&shared));
            worker_of.insert(symbol.clone(), worker);
            shards[worker].insert(
                symbol.clone(),
                OrderBook::with_counters(symbol.clone(), shared),
            );
        }

        let running = Arc::new(AtomicBool::new(true));
        let orders_read = Arc::new(AtomicU64::new(0));
        let mut senders = Vec::with_capacity(worker_count);
        let mut handles = Vec::with_capacity(worker_count);

        for (index, shard) in shards.into_iter().enumerate() {
            let (tx, rx) = match config.queue_capacity {
                Some(capacity) => bounded(capacity),
                None => unbounded(),
            };
            let running = Arc::clone(&running);
            let orders_read = Arc::clone(&orders_read);
            let handle = thread::Builder::new()
                .name(format!("{}-worker-{}", spec.name, index))
                .spawn(move || worker_loop(rx, shard, running, orders_read))
                .expect("failed to spawn partition worker");
            senders.push(tx);
            handles.push(handle);
        }

        debug!(
            partition = %spec.name,
            symbols = symbols.len(),
            workers = worker_count,
            "partition started"
        );

        Self {
            name: spec.name,
            symbols,
            worker_of,
            counters,
            senders: Mutex::new(senders),
            handles: Mutex::new(handles),
            retired: Mutex::new(Vec::new()),
            running,
            orders_read,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The symbols this partition is responsible for
    pub fn symbols(&self) -> &BTreeSet<Symbol> {
        &self.symbols
    }

    /// Check if this partition is responsible for the given symbol
    pub fn has_symbol(&self, symbol: &Symbol) -> bool {
        self.symbols.contains(symbol)
    }

    /// Enqueue an order for matching
    ///
    /// Non-blocking with the default unbounded queue; with a bounded queue
    /// this blocks until space is available. Orders are never silently
    /// dropped: submitting to a shut-down partition is an error.
    pub fn submit(&self, order: Order) -> Result<(), RouteError> {
        let Some(&worker) = self.worker_of.get(&order.symbol) else {
            return Err(RouteError::UnknownSymbol {
                symbol: order.symbol.to_string(),
            });
        };

        let sender = {
            let senders = self.senders.lock().expect("senders mutex poisoned");
            match senders.get(worker) {
                Some(tx) => tx.clone(),
                None => {
                    return Err(RouteError::PartitionShutDown {
                        partition: self.name.clone(),
                    })
                }
            }
        };

        sender.send(order).map_err(|_| RouteError::PartitionShutDown {
            partition: self.name.clone(),
        })
    }

    /// Stop the workers and reclaim their books
    ///
    /// Orders still queued are discarded; already-resting orders persist and
    /// stay inspectable via `snapshot_resting`. Idempotent, and also invoked
    /// on drop so no worker or queue outlives the partition.
    pub fn shutdown(&self) {
        self.running.store(false, Ordering::Release);

        let senders = {
            let mut guard = self.senders.lock().expect("senders mutex poisoned");
            std::mem::take(&mut *guard)
        };
        drop(senders); // disconnects the channels; workers exit after draining

        let handles = {
            let mut guard = self.handles.lock().expect("handles mutex poisoned");
            std::mem::take(&mut *guard)
        };
        if handles.is_empty() {
            return;
        }

        let mut reclaimed = Vec::new();
        for handle in handles {
            match handle.join() {
                Ok(books) => reclaimed.extend(books),
                Err(_) => warn!(partition = %self.name, "worker panicked before shutdown"),
            }
        }

        self.retired
            .lock()
            .expect("retired mutex poisoned")
            .extend(reclaimed);
        debug!(partition = %self.name, "partition shut down");
    }

    /// Whether workers are still accepting orders
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Orders dequeued for matching so far
    pub fn orders_read(&self) -> u64 {
        self.orders_read.load(Ordering::Relaxed)
    }

    /// Trades executed across all books of this partition
    pub fn total_trades(&self) -> u64 {
        self.counters.values().map(|c| c.total_trades()).sum()
    }

    /// Point-in-time counters for this partition
    pub fn stats(&self) -> PartitionStats {
        PartitionStats {
            name: self.name.clone(),
            orders_read: self.orders_read(),
            total_trades: self.total_trades(),
            books: self
                .counters
                .iter()
                .map(|(symbol, counters)| BookStats {
                    symbol: symbol.clone(),
                    total_orders: counters.total_orders(),
                    total_trades: counters.total_trades(),
                })
                .collect(),
        }
    }

    /// Snapshot the resting liquidity of this partition's books, sorted by
    /// symbol
    ///
    /// Books are single-writer while workers run, so the partition-level
    /// snapshot reflects the books reclaimed at shutdown; before shutdown it
    /// is empty. Live observability is via counters.
    pub fn snapshot_resting(&self) -> Vec<BookSnapshot> {
        let retired = self.retired.lock().expect("retired mutex poisoned");
        let mut snapshots: Vec<BookSnapshot> =
            retired.iter().map(|book| book.snapshot_resting()).collect();
        snapshots.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        snapshots
    }
}

impl Drop for Partition {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Worker body: drain the sub-shard queue into the owned books
///
/// Exits when the channel disconnects; once the running flag is lowered,
/// remaining queued orders are discarded without matching. Returns the books
/// so the partition can retain them for inspection.
fn worker_loop(
    rx: Receiver<Order>,
    mut books: HashMap<Symbol, OrderBook>,
    running: Arc<AtomicBool>,
    orders_read: Arc<AtomicU64>,
) -> Vec<OrderBook> {
    while let Ok(order) = rx.recv() {
        if !running.load(Ordering::Acquire) {
            continue;
        }
        orders_read.fetch_add(1, Ordering::Relaxed);
        match books.get_mut(&order.symbol) {
            Some(book) => book.process(order),
            // Unreachable when routed through the partition's owned set.
            None => warn!(symbol = %order.symbol, "no book for routed order"),
        }
    }
    books.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use types::ids::OrderIdGenerator;
    use types::numeric::Price;
    use types::order::Side;

    fn spec(name: &str, symbols: &[&str]) -> PartitionSpec {
        PartitionSpec {
            name: name.to_string(),
            symbols: symbols.iter().map(|s| Symbol::new(s)).collect(),
        }
    }

    fn order(ids: &OrderIdGenerator, symbol: &str, side: Side, price: u64, quantity: u64) -> Order {
        Order::new(
            ids.next_id(),
            Symbol::new(symbol),
            side,
            Price::from_u64(price),
            quantity,
            0,
        )
    }

    fn wait_until_read(partition: &Partition, n: u64) {
        let mut spins = 0;
        while partition.orders_read() < n {
            assert!(spins < 10_000, "partition never drained");
            spins += 1;
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_submit_and_match() {
        let partition = Partition::new(spec("P1", &["AAA"]), &PartitionConfig::default());
        let ids = OrderIdGenerator::new();

        partition.submit(order(&ids, "AAA", Side::SELL, 100, 10)).unwrap();
        partition.submit(order(&ids, "AAA", Side::BUY, 100, 10)).unwrap();

        wait_until_read(&partition, 2);
        partition.shutdown();

        assert_eq!(partition.total_trades(), 1);
        assert_eq!(partition.orders_read(), 2);
        let snapshots = partition.snapshot_resting();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].resting_quantity(), 0);
    }

    #[test]
    fn test_unknown_symbol_rejected() {
        let partition = Partition::new(spec("P1", &["AAA"]), &PartitionConfig::default());
        let ids = OrderIdGenerator::new();

        let err = partition
            .submit(order(&ids, "ZZZ", Side::BUY, 100, 1))
            .unwrap_err();
        assert!(matches!(err, RouteError::UnknownSymbol { .. }));
    }

    #[test]
    fn test_submit_after_shutdown_errors() {
        let partition = Partition::new(spec("P1", &["AAA"]), &PartitionConfig::default());
        let ids = OrderIdGenerator::new();

        partition.shutdown();
        let err = partition
            .submit(order(&ids, "AAA", Side::BUY, 100, 1))
            .unwrap_err();
        assert!(matches!(err, RouteError::PartitionShutDown { .. }));
    }

    #[test]
    fn test_empty_partition_is_idle() {
        let partition = Partition::new(spec("P1", &[]), &PartitionConfig::default());
        assert!(partition.symbols().is_empty());
        assert_eq!(partition.orders_read(), 0);
        partition.shutdown();
        assert!(partition.snapshot_resting().is_empty());
    }

    #[test]
    fn test_shutdown_idempotent() {
        let partition = Partition::new(spec("P1", &["AAA", "BBB"]), &PartitionConfig::default());
        partition.shutdown();
        partition.shutdown();
        assert!(!partition.is_running());
    }

    #[test]
    fn test_per_symbol_fifo_preserved() {
        // One worker per symbol sub-shard: single-producer submission order
        // is matching order, so the resting queue preserves arrival order.
        let partition = Partition::new(spec("P1", &["AAA"]), &PartitionConfig::default());
        let ids = OrderIdGenerator::new();

        for _ in 0..50 {
            partition.submit(order(&ids, "AAA", Side::BUY, 100, 1)).unwrap();
        }
        wait_until_read(&partition, 50);
        partition.shutdown();

        let snapshots = partition.snapshot_resting();
        let level = &snapshots[0].bids[0];
        let resting_ids: Vec<u64> = level.orders.iter().map(|o| o.order_id.as_u64()).collect();
        let mut sorted = resting_ids.clone();
        sorted.sort_unstable();
        assert_eq!(resting_ids, sorted, "FIFO order violated within level");
    }

    #[test]
    fn test_bounded_queue_accepts_all() {
        let config = PartitionConfig {
            workers: 1,
            queue_capacity: Some(4),
        };
        let partition = Partition::new(spec("P1", &["AAA"]), &config);
        let ids = OrderIdGenerator::new();

        // More orders than capacity: submit blocks rather than dropping.
        for _ in 0..64 {
            partition.submit(order(&ids, "AAA", Side::BUY, 100, 1)).unwrap();
        }
        wait_until_read(&partition, 64);
        partition.shutdown();
        assert_eq!(partition.orders_read(), 64);
    }

    #[test]
    fn test_has_symbol() {
        let partition = Partition::new(spec("P1", &["AAA", "BBB"]), &PartitionConfig::default());
        assert!(partition.has_symbol(&Symbol::new("AAA")));
        assert!(!partition.has_symbol(&Symbol::new("CCC")));
    }

    #[test]
    fn test_stats_cover_all_books() {
        let partition = Partition::new(spec("P1", &["AAA", "BBB", "CCC"]), &PartitionConfig::default());
        let stats = partition.stats();
        assert_eq!(stats.books.len(), 3);
        assert_eq!(stats.name, "P1");
    }
}
