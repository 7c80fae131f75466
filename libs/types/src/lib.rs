//! Shared domain types for the sharded matching engine
//!
//! Primitives used across the engine core and its tools:
//! - `ids` — order identifiers, the engine-owned id generator, symbols
//! - `numeric` — tick-quantized prices with decimal conversion at the boundary
//! - `order` — order sides and the order record itself
//! - `errors` — routing error taxonomy

pub mod errors;
pub mod ids;
pub mod numeric;
pub mod order;
