//! Fill records and the optional subscriber hook
//!
//! The engine's default observable output is counters only. A book accepts
//! an optional hook invoked once per fill for future subscribers (market
//! data, persistence); nothing in the core installs one.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use types::ids::{OrderId, Symbol};
use types::numeric::Price;

/// One fill: a head-of-queue consumption step during matching
///
/// The price is the resting (maker) order's price; the aggressor is a
/// price-taker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub symbol: Symbol,
    pub maker_order_id: OrderId,
    pub taker_order_id: OrderId,
    pub price: Price,
    pub quantity: u64,
    pub executed_at: i64,
}

/// Hook invoked synchronously for each fill produced by `OrderBook::process`
pub type FillHook = Arc<dyn Fn(&Fill) + Send + Sync>;
