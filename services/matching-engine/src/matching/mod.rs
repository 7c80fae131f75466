//! Matching logic
//!
//! Price-compatibility predicates used by the book's matching loop.

pub mod crossing;
