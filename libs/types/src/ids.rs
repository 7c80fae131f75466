//! Identifier types for engine entities
//!
//! Order ids are monotonic 64-bit integers drawn from a generator owned by
//! the engine instance (not a process global), so independent engines can
//! coexist in one process without sharing an id space.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Unique identifier for an order
///
/// Monotonically increasing within one `OrderIdGenerator`. Uniqueness is what
/// matters; strict global ordering across generators is not guaranteed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(u64);

impl OrderId {
    /// Create from a raw value (tests, replay)
    pub fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Get the inner value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic order-id source
///
/// Cheap to clone; clones share the same counter. The first id issued is 1.
#[derive(Debug, Clone, Default)]
pub struct OrderIdGenerator {
    next: Arc<AtomicU64>,
}

impl OrderIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next order id
    pub fn next_id(&self) -> OrderId {
        OrderId(self.next.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

/// Interned symbol key
///
/// Cheap to clone and hash; used as the map key for books, partitions, and
/// routing tables. Ordered so symbol sets iterate deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(Arc<str>);

impl Symbol {
    pub fn new(symbol: impl AsRef<str>) -> Self {
        Self(Arc::from(symbol.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl Serialize for Symbol {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s))
    }
}
