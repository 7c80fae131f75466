//! Engine lifecycle wiring
//!
//! Composes partitions, the router, and the engine-owned order-id generator
//! into one handle: construct at startup, route orders while running, poll
//! stats, shut down once.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;
use types::errors::{RouteError, RouterError};
use types::ids::{OrderId, OrderIdGenerator, Symbol};
use types::numeric::Price;
use types::order::{Order, Side};

use crate::book::BookSnapshot;
use crate::metrics::EngineStats;
use crate::partition::{Partition, PartitionConfig, PartitionSpec};
use crate::router::OrderRouter;

/// The sharded matching engine
///
/// Owns its id generator rather than using a process-wide counter, so
/// multiple engines can coexist in one process.
#[derive(Debug)]
pub struct MatchingEngine {
    router: OrderRouter,
    order_ids: OrderIdGenerator,
}

impl MatchingEngine {
    /// Build the engine from a partition layout
    ///
    /// Fails fast if the layout assigns one symbol to two partitions.
    pub fn new(layout: Vec<PartitionSpec>, config: &PartitionConfig) -> Result<Self, RouterError> {
        let partitions = layout
            .into_iter()
            .map(|spec| Arc::new(Partition::new(spec, config)))
            .collect();
        let router = OrderRouter::new(partitions)?;
        debug!(partitions = router.partitions().len(), "engine started");
        Ok(Self {
            router,
            order_ids: OrderIdGenerator::new(),
        })
    }

    /// Ingress entry point: build an order and dispatch it
    ///
    /// Assigns the order id and arrival timestamp, then routes. Returns the
    /// assigned id so callers can correlate diagnostics.
    pub fn route(
        &self,
        symbol: Symbol,
        side: Side,
        price: Price,
        quantity: u64,
    ) -> Result<OrderId, RouteError> {
        let order_id = self.order_ids.next_id();
        let order = Order::new(order_id, symbol, side, price, quantity, unix_nanos_now());
        self.router.route(order)?;
        Ok(order_id)
    }

    /// Dispatch an already-built order
    pub fn submit(&self, order: Order) -> Result<(), RouteError> {
        self.router.route(order)
    }

    /// The engine's id generator (for callers building orders themselves)
    pub fn order_ids(&self) -> &OrderIdGenerator {
        &self.order_ids
    }

    pub fn partitions(&self) -> &[Arc<Partition>] {
        self.router.partitions()
    }

    /// The partition owning a symbol, if any
    pub fn partition_for(&self, symbol: &Symbol) -> Option<&Arc<Partition>> {
        self.router.partition_for(symbol)
    }

    /// Point-in-time counters across all partitions
    pub fn stats(&self) -> EngineStats {
        EngineStats::from_partitions(
            self.router
                .partitions()
                .iter()
                .map(|p| p.stats())
                .collect(),
        )
    }

    /// Snapshot resting liquidity across all partitions (post-shutdown)
    pub fn snapshot_resting(&self) -> Vec<BookSnapshot> {
        self.router
            .partitions()
            .iter()
            .flat_map(|p| p.snapshot_resting())
            .collect()
    }

    /// Shut down every partition: workers exit, queued orders are discarded,
    /// resting books are retained for inspection
    pub fn shutdown(&self) {
        for partition in self.router.partitions() {
            partition.shutdown();
        }
    }
}

fn unix_nanos_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as i64)
        .unwrap_or(0)
}
