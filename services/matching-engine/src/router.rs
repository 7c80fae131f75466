//! Static symbol→partition dispatch
//!
//! The routing table is built once from the partition list and never
//! mutated, so routing is a lock-free O(1) lookup. Construction fails fast
//! if two partitions claim the same symbol.

use std::collections::HashMap;
use std::sync::Arc;
use types::errors::{RouteError, RouterError};
use types::ids::Symbol;
use types::order::Order;

use crate::partition::Partition;

/// Routes incoming orders to the partition owning their symbol
pub struct OrderRouter {
    partitions: Vec<Arc<Partition>>,
    table: HashMap<Symbol, usize>,
}

impl std::fmt::Debug for OrderRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderRouter")
            .field("partitions", &self.partitions.len())
            .field("table", &self.table)
            .finish()
    }
}

impl OrderRouter {
    /// Build the routing table from the partition list
    ///
    /// The partitions' symbol sets must be disjoint; a symbol claimed twice
    /// is a configuration error reported immediately.
    pub fn new(partitions: Vec<Arc<Partition>>) -> Result<Self, RouterError> {
        let mut table: HashMap<Symbol, usize> = HashMap::new();
        for (index, partition) in partitions.iter().enumerate() {
            for symbol in partition.symbols() {
                if let Some(&first) = table.get(symbol) {
                    return Err(RouterError::DuplicateSymbol {
                        symbol: symbol.to_string(),
                        first: partitions[first].name().to_string(),
                        second: partition.name().to_string(),
                    });
                }
                table.insert(symbol.clone(), index);
            }
        }
        Ok(Self { partitions, table })
    }

    /// Dispatch an order to its owning partition
    ///
    /// Blocks only through `Partition::submit` (bounded queues); a symbol no
    /// partition owns is reported and not enqueued.
    pub fn route(&self, order: Order) -> Result<(), RouteError> {
        match self.table.get(&order.symbol) {
            Some(&index) => self.partitions[index].submit(order),
            None => Err(RouteError::UnknownSymbol {
                symbol: order.symbol.to_string(),
            }),
        }
    }

    /// The partition owning a symbol, if any
    pub fn partition_for(&self, symbol: &Symbol) -> Option<&Arc<Partition>> {
        self.table.get(symbol).map(|&index| &self.partitions[index])
    }

    pub fn partitions(&self) -> &[Arc<Partition>] {
        &self.partitions
    }
}
