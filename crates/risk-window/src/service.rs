//! The window manager (§4.7): owns every live window, assigns incoming
//! events to them, and drives the scheduler tick that pushes windows through
//! OPEN -> PROVISIONAL -> FINAL.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use risk_finality::FinalityTracker;
use risk_types::{
    AggregatedRiskSnapshot, ChainProfile, ChainRpc, CoinConfig, RiskEvent, TcsConfig, TimeWindow, WindowConfig,
    WindowState,
};
use tracing::{debug, info, warn};

use crate::domain::{add_event, can_transition_to_final, can_transition_to_provisional, generate_snapshot, window_bounds};
use crate::error::{WindowError, WindowResult};
use crate::metrics;

fn window_key(coin: &str, window_id: &str) -> String {
    format!("{coin}:{window_id}")
}

/// Owns the live window set for every `(coin, window_id)` pair and the
/// context needed to refresh finality and aggregate on transition.
pub struct WindowManager {
    config: WindowConfig,
    tcs_config: TcsConfig,
    coins: HashMap<String, CoinConfig>,
    chains: HashMap<String, ChainProfile>,
    windows: Mutex<HashMap<String, TimeWindow>>,
}

impl WindowManager {
    pub fn new(
        config: WindowConfig,
        tcs_config: TcsConfig,
        coins: HashMap<String, CoinConfig>,
        chains: HashMap<String, ChainProfile>,
    ) -> Self {
        WindowManager {
            config,
            tcs_config,
            coins,
            chains,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Assign `event` to the window its timestamp falls into, creating the
    /// window if this is its first event (invariant 8, §8).
    pub fn assign_event(&self, event: RiskEvent, now: DateTime<Utc>) -> WindowResult<()> {
        if !self.coins.contains_key(&event.coin) {
            return Err(WindowError::UnknownCoin { coin: event.coin.clone() });
        }
        if !self.chains.contains_key(&event.chain) {
            return Err(WindowError::UnknownChain { chain: event.chain.clone() });
        }

        let (window_id, start, end) = window_bounds(event.timestamp, self.config.size_secs);
        let key = window_key(&event.coin, &window_id);

        let mut windows = self.windows.lock();
        let window = windows
            .entry(key)
            .or_insert_with(|| TimeWindow::new(window_id, start, end, now));
        let result = add_event(window, event, self.config.max_events_per_window);
        if let Err(WindowError::AtCapacity { window_id, max }) = &result {
            warn!(window_id = %window_id, max, "window at capacity, dropping event");
        }
        result
    }

    /// Number of live windows currently tracked, for diagnostics and tests.
    pub fn live_window_count(&self) -> usize {
        self.windows.lock().len()
    }

    /// One scheduler tick (§4.7): advance OPEN windows whose close has
    /// passed into PROVISIONAL, refresh finality for PROVISIONAL windows'
    /// events, and promote fully-resolved PROVISIONAL windows to FINAL,
    /// emitting their snapshot.
    pub async fn scheduler_tick(&self, rpcs: &HashMap<String, Arc<dyn ChainRpc>>, now: DateTime<Utc>) -> Vec<AggregatedRiskSnapshot> {
        self.advance_open_windows(now);

        let provisional_keys: Vec<(String, String)> = {
            let windows = self.windows.lock();
            windows
                .iter()
                .filter(|(_, w)| w.state == WindowState::Provisional)
                .map(|(key, w)| (key.clone(), w.window_id.clone()))
                .collect()
        };

        let mut snapshots = Vec::new();
        for (key, _window_id) in provisional_keys {
            let mut window = match self.windows.lock().remove(&key) {
                Some(w) => w,
                None => continue,
            };

            self.refresh_finality(&mut window, rpcs, now).await;

            if can_transition_to_final(&window, now, self.config.finalization_delay_secs) {
                window.state = WindowState::Final;
                window.final_at = Some(now);
                let coin_symbol = window.events.first().map(|e| e.coin.clone());
                if let Some(coin_symbol) = coin_symbol {
                    if let Some(coin) = self.coins.get(&coin_symbol) {
                        generate_snapshot(&mut window, coin, &self.tcs_config, now);
                        if let Some(snapshot) = window.snapshot.clone() {
                            metrics::record_window_finalized(&coin_symbol);
                            info!(window_id = %window.window_id, coin = %coin_symbol, "window finalized");
                            snapshots.push(snapshot);
                        }
                    } else {
                        warn!(coin = %coin_symbol, "finalized window references unknown coin");
                    }
                }
            }

            self.windows.lock().insert(key, window);
        }

        snapshots
    }

    fn advance_open_windows(&self, now: DateTime<Utc>) {
        let mut windows = self.windows.lock();
        for window in windows.values_mut() {
            if can_transition_to_provisional(window, now, self.config.provisional_delay_secs) {
                window.state = WindowState::Provisional;
                window.provisional_at = Some(now);
                debug!(window_id = %window.window_id, "window -> PROVISIONAL");
            }
        }
    }

    async fn refresh_finality(&self, window: &mut TimeWindow, rpcs: &HashMap<String, Arc<dyn ChainRpc>>, now: DateTime<Utc>) {
        for event in window.events.iter_mut() {
            if event.is_finalized || event.invalidated {
                continue;
            }
            let Some(profile) = self.chains.get(&event.chain) else {
                continue;
            };
            let Some(rpc) = rpcs.get(&event.chain) else {
                continue;
            };
            if let Err(err) = FinalityTracker::update_event_finality(profile, rpc.as_ref(), event, now).await {
                warn!(chain = %event.chain, error = %err, "finality refresh failed");
            }
        }
    }

    /// Drop FINAL windows older than the configured retention (§4.7 janitor).
    pub fn cleanup_old_windows(&self, now: DateTime<Utc>) {
        let retention = chrono::Duration::hours(self.config.retention_hours);
        let mut windows = self.windows.lock();
        windows.retain(|_, w| {
            !(w.state == WindowState::Final && w.final_at.map(|t| now - t > retention).unwrap_or(false))
        });
    }
}
