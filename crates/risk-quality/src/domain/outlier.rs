//! Stage 3: outlier flagging (§4.2).
//!
//! Groups survivors by `(coin, chain)` and screens every populated numeric
//! metric independently against that group's mean/stddev. Outliers are
//! retained with a quality penalty, never dropped — downstream consumers
//! (the cross-chain aggregator) decide how much weight to give them.

use std::collections::HashMap;

use risk_types::{QualityConfig, RiskEvent};

const MIN_GROUP_SIZE: usize = 3;

struct Metric {
    values: Vec<(usize, f64)>,
}

fn populated_metrics(events: &[RiskEvent]) -> Vec<Metric> {
    let extractors: [fn(&RiskEvent) -> Option<f64>; 6] = [
        |e| e.price,
        |e| e.liquidity_depth,
        |e| e.volume,
        |e| e.net_supply_change,
        |e| e.market_volatility,
        |e| e.sentiment_score,
    ];

    extractors
        .iter()
        .map(|extract| Metric {
            values: events
                .iter()
                .enumerate()
                .filter_map(|(idx, e)| extract(e).map(|v| (idx, v)))
                .collect(),
        })
        .collect()
}

fn mean_stddev(values: &[f64]) -> Option<(f64, f64)> {
    let n = values.len();
    if n < MIN_GROUP_SIZE {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let stddev = variance.sqrt();
    if stddev == 0.0 {
        None
    } else {
        Some((mean, stddev))
    }
}

/// Flag outliers in place. Runs on already-normalized (and therefore
/// already-clamped) data — clamping must happen before this stage runs, not
/// the other way around, or an out-of-bounds value would pull the group's
/// mean/stddev before being screened against it.
pub fn flag_outliers(events: &mut [RiskEvent], config: &QualityConfig) {
    let mut groups: HashMap<(String, String), Vec<usize>> = HashMap::new();
    for (idx, event) in events.iter().enumerate() {
        groups
            .entry((event.coin.clone(), event.chain.clone()))
            .or_default()
            .push(idx);
    }

    for indices in groups.values() {
        if indices.len() < MIN_GROUP_SIZE {
            continue;
        }

        let group_events: Vec<RiskEvent> = indices.iter().map(|&i| events[i].clone()).collect();
        let metrics = populated_metrics(&group_events);

        let mut flagged: HashMap<usize, bool> = HashMap::new();
        for metric in &metrics {
            if metric.values.len() < MIN_GROUP_SIZE {
                continue;
            }
            let values: Vec<f64> = metric.values.iter().map(|(_, v)| *v).collect();
            let Some((mean, stddev)) = mean_stddev(&values) else {
                continue;
            };
            for &(local_idx, value) in &metric.values {
                let z = (value - mean).abs() / stddev;
                if z > config.z_threshold {
                    flagged.insert(local_idx, true);
                }
            }
        }

        for (local_idx, &global_idx) in indices.iter().enumerate() {
            if flagged.contains_key(&local_idx) {
                events[global_idx].is_outlier = true;
                events[global_idx].quality_score *= 0.5;
            }
        }
    }
}
