//! Random order synthesis
//!
//! Deterministic seeded flow: uniform symbol choice, prices drawn on the
//! 0.05 tick grid within each symbol's configured band, uniform side, and
//! quantities from 1 to 100.

use crate::config::SymbolSpec;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use types::ids::Symbol;
use types::numeric::Price;
use types::order::Side;

/// Parameters of one synthesized order
#[derive(Debug, Clone)]
pub struct SyntheticOrder {
    pub symbol: Symbol,
    pub side: Side,
    pub price: Price,
    pub quantity: u64,
}

/// Seeded order generator; one per producer thread
pub struct OrderFlow {
    rng: ChaCha8Rng,
    bands: Vec<(Symbol, i64, i64)>, // symbol, min ticks, max ticks
}

impl OrderFlow {
    pub fn new(symbols: &[SymbolSpec], seed: u64) -> Self {
        let bands = symbols
            .iter()
            .filter_map(|spec| {
                let min = Price::try_from_f64(spec.min_price)?;
                let max = Price::try_from_f64(spec.max_price)?;
                Some((spec.symbol.clone(), min.ticks(), max.ticks()))
            })
            .collect();
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            bands,
        }
    }

    /// Synthesize the next order
    pub fn next_order(&mut self) -> SyntheticOrder {
        let (symbol, min_ticks, max_ticks) = {
            let index = self.rng.gen_range(0..self.bands.len());
            self.bands[index].clone()
        };

        let price = Price::from_ticks(self.rng.gen_range(min_ticks..=max_ticks));
        let side = if self.rng.gen_bool(0.5) {
            Side::BUY
        } else {
            Side::SELL
        };
        let quantity = self.rng.gen_range(1..=100);

        SyntheticOrder {
            symbol,
            side,
            price,
            quantity,
        }
    }
}
