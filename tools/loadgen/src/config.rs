//! Load-driver configuration
//!
//! Loaded from JSON. The symbol universe carries per-symbol price ranges for
//! the synthesizer; the partition layout is derived by round-robin over the
//! sorted symbol list so every symbol is covered regardless of whether the
//! universe divides evenly by the partition count.

use anyhow::{ensure, Context, Result};
use matching_engine::partition::PartitionSpec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use types::ids::Symbol;

/// One tradable symbol and the price band the synthesizer draws from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolSpec {
    pub symbol: Symbol,
    pub min_price: f64,
    pub max_price: f64,
}

/// Driver settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub symbols: Vec<SymbolSpec>,
    /// Number of partitions to spread the universe across
    pub partitions: usize,
    /// Worker threads per partition
    pub workers_per_partition: usize,
    /// Target aggregate order rate
    pub orders_per_second: u64,
    /// How long to generate load
    pub duration_secs: u64,
    /// Producer threads sharing the target rate
    pub producers: usize,
    /// RNG seed; producer i uses seed + i
    pub seed: u64,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            symbols: (1..=25)
                .map(|i| SymbolSpec {
                    symbol: Symbol::new(format!("Stock{i}")),
                    min_price: 10.0 * i as f64,
                    max_price: 15.0 * i as f64,
                })
                .collect(),
            partitions: 5,
            workers_per_partition: 5,
            orders_per_second: 400,
            duration_secs: 20,
            producers: 3,
            seed: 42,
        }
    }
}

impl LoadConfig {
    /// Read a config from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.symbols.is_empty(), "config has no symbols");
        ensure!(self.partitions > 0, "partition count must be positive");
        ensure!(self.producers > 0, "producer count must be positive");
        ensure!(self.orders_per_second > 0, "order rate must be positive");
        for spec in &self.symbols {
            ensure!(
                spec.min_price > 0.0 && spec.max_price >= spec.min_price,
                "symbol {} has an invalid price range",
                spec.symbol
            );
        }
        Ok(())
    }

    /// Derive the partition layout: sorted symbols dealt round-robin across
    /// the partitions, covering the whole universe
    pub fn partition_layout(&self) -> Vec<PartitionSpec> {
        let mut symbols: Vec<Symbol> = self.symbols.iter().map(|s| s.symbol.clone()).collect();
        symbols.sort();

        let count = self.partitions.min(symbols.len()).max(1);
        let mut layout: Vec<PartitionSpec> = (0..count)
            .map(|i| PartitionSpec {
                name: format!("Partition-{}", i + 1),
                symbols: Vec::new(),
            })
            .collect();
        for (i, symbol) in symbols.into_iter().enumerate() {
            layout[i % count].symbols.push(symbol);
        }
        layout
    }
}
