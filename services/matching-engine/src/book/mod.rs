//! Per-symbol order book
//!
//! Two price-ordered sides plus the continuous-double-auction matching
//! algorithm. A book is continuously open: each incoming order is matched
//! against the opposing side from the best level inward, and any residual
//! rests on its own side.

pub mod ask_book;
pub mod bid_book;
pub mod price_level;

pub use ask_book::AskBook;
pub use bid_book::BidBook;
pub use price_level::{PriceLevel, RestingOrder};

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use types::ids::Symbol;
use types::numeric::Price;
use types::order::{Order, Side};

use crate::events::{Fill, FillHook};
use crate::matching::crossing;
use crate::metrics::BookCounters;

/// Per-symbol two-sided book
///
/// Owned exclusively by one partition worker; only the counters are shared
/// with monitors. After every completed `process` call the book is uncrossed:
/// the best bid is strictly below the best ask, or one side is empty.
pub struct OrderBook {
    symbol: Symbol,
    bids: BidBook,
    asks: AskBook,
    counters: Arc<BookCounters>,
    fill_hook: Option<FillHook>,
}

impl OrderBook {
    pub fn new(symbol: Symbol) -> Self {
        Self::with_counters(symbol, Arc::new(BookCounters::new()))
    }

    /// Create a book whose counters are registered elsewhere (the owning
    /// partition keeps a clone so stats stay readable while a worker owns
    /// the book state)
    pub(crate) fn with_counters(symbol: Symbol, counters: Arc<BookCounters>) -> Self {
        Self {
            symbol,
            bids: BidBook::new(),
            asks: AskBook::new(),
            counters,
            fill_hook: None,
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Install the optional fill hook, invoked once per fill
    pub fn set_fill_hook(&mut self, hook: FillHook) {
        self.fill_hook = Some(hook);
    }

    pub fn counters(&self) -> &Arc<BookCounters> {
        &self.counters
    }

    /// Orders processed by this book (one per `process` call)
    pub fn total_orders(&self) -> u64 {
        self.counters.total_orders()
    }

    /// Trades executed by this book (one per head-order consumption step)
    pub fn total_trades(&self) -> u64 {
        self.counters.total_trades()
    }

    /// Process an incoming order: match against the opposing side, then rest
    /// any residual on the own side
    ///
    /// Total on all inputs. Orders with zero quantity or a non-positive
    /// price are counted and otherwise ignored.
    pub fn process(&mut self, mut order: Order) {
        self.counters.record_order();

        if order.quantity == 0 || order.price.ticks() <= 0 {
            debug!(
                symbol = %self.symbol,
                order_id = %order.order_id,
                "ignoring degenerate order"
            );
            return;
        }

        match order.side {
            Side::BUY => self.match_buy(&mut order),
            Side::SELL => self.match_sell(&mut order),
        }

        if order.quantity > 0 {
            let resting = RestingOrder {
                order_id: order.order_id,
                quantity: order.quantity,
                timestamp: order.timestamp,
            };
            match order.side {
                Side::BUY => self.bids.insert(order.price, resting),
                Side::SELL => self.asks.insert(order.price, resting),
            }
        }
    }

    /// Match an incoming BUY against asks, best (lowest) level inward
    fn match_buy(&mut self, order: &mut Order) {
        while order.quantity > 0 {
            let Some(level_price) = self.asks.best_price() else {
                break;
            };
            if !crossing::incoming_can_match(Side::BUY, order.price, level_price) {
                break;
            }

            let Some(level) = self.asks.level_mut(level_price) else {
                break;
            };
            Self::consume_level(level, level_price, order, &self.symbol, &self.counters, &self.fill_hook);

            if level.is_empty() {
                self.asks.remove_level(level_price);
            }
        }
    }

    /// Match an incoming SELL against bids, best (highest) level inward
    fn match_sell(&mut self, order: &mut Order) {
        while order.quantity > 0 {
            let Some(level_price) = self.bids.best_price() else {
                break;
            };
            if !crossing::incoming_can_match(Side::SELL, order.price, level_price) {
                break;
            }

            let Some(level) = self.bids.level_mut(level_price) else {
                break;
            };
            Self::consume_level(level, level_price, order, &self.symbol, &self.counters, &self.fill_hook);

            if level.is_empty() {
                self.bids.remove_level(level_price);
            }
        }
    }

    /// Consume resting orders at one level in FIFO order
    ///
    /// Each head consumption is one trade, printed at the level (maker)
    /// price; both sides lose exactly the fill quantity.
    fn consume_level(
        level: &mut PriceLevel,
        level_price: Price,
        order: &mut Order,
        symbol: &Symbol,
        counters: &BookCounters,
        fill_hook: &Option<FillHook>,
    ) {
        while order.quantity > 0 {
            let Some(resting) = level.front() else {
                break;
            };
            let fill = order.quantity.min(resting.quantity);
            let maker_order_id = resting.order_id;

            level.fill_front(fill);
            order.fill(fill);
            counters.record_trade();

            if let Some(hook) = fill_hook {
                hook(&Fill {
                    symbol: symbol.clone(),
                    maker_order_id,
                    taker_order_id: order.order_id,
                    price: level_price,
                    quantity: fill,
                    executed_at: order.timestamp,
                });
            }
        }
    }

    /// Snapshot resting orders grouped by side and price (diagnostics/tests)
    pub fn snapshot_resting(&self) -> BookSnapshot {
        BookSnapshot {
            symbol: self.symbol.clone(),
            bids: self.bids.iter().map(LevelSnapshot::from_level).collect(),
            asks: self.asks.iter().map(LevelSnapshot::from_level).collect(),
        }
    }

    /// Check if both sides are empty
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Best bid price, if any
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    /// Best ask price, if any
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }
}

/// Resting orders at one price, best-first within its side's snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    pub price: Price,
    pub orders: Vec<RestingOrder>,
    pub total_quantity: u64,
}

impl LevelSnapshot {
    fn from_level((price, level): (Price, &PriceLevel)) -> Self {
        Self {
            price,
            orders: level.iter().cloned().collect(),
            total_quantity: level.total_quantity(),
        }
    }
}

/// Snapshot of one book's resting liquidity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub symbol: Symbol,
    /// Bid levels, highest price first
    pub bids: Vec<LevelSnapshot>,
    /// Ask levels, lowest price first
    pub asks: Vec<LevelSnapshot>,
}

impl BookSnapshot {
    pub fn bid_level(&self, price: Price) -> Option<&LevelSnapshot> {
        self.bids.iter().find(|l| l.price == price)
    }

    pub fn ask_level(&self, price: Price) -> Option<&LevelSnapshot> {
        self.asks.iter().find(|l| l.price == price)
    }

    /// Total resting quantity across both sides
    pub fn resting_quantity(&self) -> u64 {
        self.bids
            .iter()
            .chain(self.asks.iter())
            .map(|l| l.total_quantity)
            .sum()
    }
}
