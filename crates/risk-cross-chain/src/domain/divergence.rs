//! Cross-chain price divergence detection (§4.6): a signal, not a fault —
//! divergent chains are reported alongside the snapshot, never used to
//! invalidate it.

use super::batch::ChainEventBatch;

/// One divergent chain pair.
#[derive(Debug, Clone, PartialEq)]
pub struct DivergencePair {
    pub chain_a: String,
    pub chain_b: String,
    pub avg_price_a: f64,
    pub avg_price_b: f64,
    pub absolute_difference: f64,
    pub percentage_difference: f64,
}

fn avg_price(batch: &ChainEventBatch) -> Option<f64> {
    let prices: Vec<f64> = batch.events.iter().filter_map(|e| e.price).collect();
    if prices.is_empty() {
        None
    } else {
        Some(prices.iter().sum::<f64>() / prices.len() as f64)
    }
}

/// Flag all chain pairs whose mean price differs by more than `threshold`
/// (absolute terms; default 0.01 i.e. 1%).
pub fn detect_divergence(batches: &[ChainEventBatch], threshold: f64) -> Vec<DivergencePair> {
    let priced: Vec<(&ChainEventBatch, f64)> = batches
        .iter()
        .filter_map(|b| avg_price(b).map(|p| (b, p)))
        .collect();

    let mut pairs = Vec::new();
    for i in 0..priced.len() {
        for j in (i + 1)..priced.len() {
            let (batch_a, price_a) = priced[i];
            let (batch_b, price_b) = priced[j];
            let absolute_difference = (price_a - price_b).abs();
            if absolute_difference > threshold {
                pairs.push(DivergencePair {
                    chain_a: batch_a.chain.clone(),
                    chain_b: batch_b.chain.clone(),
                    avg_price_a: price_a,
                    avg_price_b: price_b,
                    absolute_difference,
                    percentage_difference: absolute_difference / price_a * 100.0,
                });
            }
        }
    }
    pairs
}
