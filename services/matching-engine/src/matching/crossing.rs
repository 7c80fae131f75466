//! Crossing detection logic
//!
//! Determines when an incoming order's limit is compatible with a resting
//! level. Price is inclusive on both sides: `BUY @ p` matches `ASK @ p`.

use types::numeric::Price;
use types::order::Side;

/// Check if a bid and ask can match at given prices
pub fn can_match(bid_price: Price, ask_price: Price) -> bool {
    bid_price >= ask_price
}

/// Check if an incoming order can match against a resting level
///
/// A BUY crosses every ask level priced at or below its limit; a SELL
/// crosses every bid level priced at or above its limit.
pub fn incoming_can_match(incoming_side: Side, incoming_price: Price, resting_price: Price) -> bool {
    match incoming_side {
        Side::BUY => incoming_price >= resting_price,
        Side::SELL => incoming_price <= resting_price,
    }
}
