//! Routing error taxonomy
//!
//! The core retries nothing internally; conditions are surfaced to the
//! caller, which owns telemetry policy.

use thiserror::Error;

/// Errors raised while building the router
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    #[error("symbol {symbol} claimed by both partition {first} and partition {second}")]
    DuplicateSymbol {
        symbol: String,
        first: String,
        second: String,
    },
}

/// Errors raised while routing an order
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("no partition owns symbol {symbol}")]
    UnknownSymbol { symbol: String },

    #[error("partition {partition} is shut down")]
    PartitionShutDown { partition: String },
}
