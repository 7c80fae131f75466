//! Order record and side
//!
//! An order is immutable on arrival except for its residual quantity, which
//! decreases monotonically to zero as it fills. The timestamp is wall-clock
//! arrival time and is used for diagnostics only; priority within a price
//! level comes from queue insertion order, not from the timestamp.

use crate::ids::{OrderId, Symbol};
use crate::numeric::Price;
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    BUY,
    /// Sell order (ask)
    SELL,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::BUY => Side::SELL,
            Side::SELL => Side::BUY,
        }
    }
}

/// A limit order
///
/// `quantity` is the residual: it starts at the submitted size and only ever
/// decreases. An order whose quantity reaches zero is removed from all books
/// and never referenced again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub symbol: Symbol,
    pub side: Side,
    pub price: Price,
    pub quantity: u64,
    pub timestamp: i64, // Unix nanos, diagnostics only
}

impl Order {
    pub fn new(
        order_id: OrderId,
        symbol: Symbol,
        side: Side,
        price: Price,
        quantity: u64,
        timestamp: i64,
    ) -> Self {
        Self {
            order_id,
            symbol,
            side,
            price,
            quantity,
            timestamp,
        }
    }

    /// Reduce the residual by a fill
    ///
    /// # Panics
    /// Panics in debug builds if the fill exceeds the residual
    pub fn fill(&mut self, fill_quantity: u64) {
        debug_assert!(
            fill_quantity <= self.quantity,
            "fill would exceed residual quantity"
        );
        self.quantity -= fill_quantity;
    }

    /// Check if the order is completely filled
    pub fn is_filled(&self) -> bool {
        self.quantity == 0
    }
}
