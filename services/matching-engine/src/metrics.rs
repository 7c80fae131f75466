//! Counters and polled stats snapshots
//!
//! Counters are atomic 64-bit values written by workers and read by
//! monitors; readers tolerate lagging a write by one increment. The
//! serializable stats structs are the polled observability surface.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use types::ids::Symbol;

/// Per-book performance counters
///
/// Shared between the worker that owns the book state and any monitor
/// polling stats.
#[derive(Debug, Default)]
pub struct BookCounters {
    total_orders: AtomicU64,
    total_trades: AtomicU64,
}

impl BookCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one processed order
    pub fn record_order(&self) {
        self.total_orders.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one executed trade
    pub fn record_trade(&self) {
        self.total_trades.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total_orders(&self) -> u64 {
        self.total_orders.load(Ordering::Relaxed)
    }

    pub fn total_trades(&self) -> u64 {
        self.total_trades.load(Ordering::Relaxed)
    }
}

/// Point-in-time counters for one book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookStats {
    pub symbol: Symbol,
    pub total_orders: u64,
    pub total_trades: u64,
}

/// Point-in-time counters for one partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionStats {
    pub name: String,
    pub orders_read: u64,
    pub total_trades: u64,
    pub books: Vec<BookStats>,
}

/// Point-in-time counters for the whole engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineStats {
    pub orders_read: u64,
    pub total_trades: u64,
    pub partitions: Vec<PartitionStats>,
}

impl EngineStats {
    /// Aggregate per-partition stats into engine totals
    pub fn from_partitions(partitions: Vec<PartitionStats>) -> Self {
        Self {
            orders_read: partitions.iter().map(|p| p.orders_read).sum(),
            total_trades: partitions.iter().map(|p| p.total_trades).sum(),
            partitions,
        }
    }
}
