//! Price level with FIFO queue
//!
//! A price level holds every resting order at a single price on one side.
//! Insertion order within the level is the price-time tie-breaker: the head
//! of the queue is always consumed first.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use types::ids::OrderId;

/// The residual of an order resting on the book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestingOrder {
    pub order_id: OrderId,
    pub quantity: u64,
    /// Arrival time in unix nanos, diagnostics only
    pub timestamp: i64,
}

/// A price level containing orders at a specific price
///
/// Maintains strict FIFO ordering for time priority, plus the running total
/// of resting quantity, which always equals the sum of its orders' residuals.
#[derive(Debug, Clone, Default)]
pub struct PriceLevel {
    orders: VecDeque<RestingOrder>,
    total_quantity: u64,
}

impl PriceLevel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an order at the back of the queue (time priority)
    pub fn insert(&mut self, order: RestingOrder) {
        self.total_quantity += order.quantity;
        self.orders.push_back(order);
    }

    /// Peek at the head order without removing it
    pub fn front(&self) -> Option<&RestingOrder> {
        self.orders.front()
    }

    /// Fill the head order by `fill` units
    ///
    /// The head is removed once its residual reaches zero. `fill` must not
    /// exceed the head's residual.
    pub fn fill_front(&mut self, fill: u64) {
        if let Some(head) = self.orders.front_mut() {
            debug_assert!(fill <= head.quantity, "fill exceeds head residual");
            head.quantity -= fill;
            self.total_quantity -= fill;
            if head.quantity == 0 {
                self.orders.pop_front();
            }
        }
    }

    /// Check if the price level is empty
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Get the total quantity at this price level
    pub fn total_quantity(&self) -> u64 {
        self.total_quantity
    }

    /// Get the number of orders at this level
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Iterate resting orders in queue (time-priority) order
    pub fn iter(&self) -> impl Iterator<Item = &RestingOrder> {
        self.orders.iter()
    }
}
