//! Wires every subsystem crate together behind one `Engine` (grounded in
//! the teacher's `node-runtime::container::SubsystemContainer`, flattened
//! to this engine's single dependency level — nothing here needs the
//! teacher's four-level init ordering since the subsystems form a simple
//! chain: quality -> window -> cross-chain, with block-monitor/reorg
//! feeding corrections back into window).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Utc;
use risk_bus::{BusAndStdoutSink, EventPublisher, InMemoryEventBus, RiskEngineEvent, SnapshotSink};
use risk_block_monitor::BlockMonitor;
use risk_quality::QualityPipeline;
use risk_reorg::ReorgHandler;
use risk_types::{ChainRpc, EngineConfig, RiskSource};
use risk_window::WindowManager;
use tracing::{debug, info, warn};

use crate::config::Selection;
use crate::fixtures::{OffChainMetricSource, OnChainPriceSource, SimulatedChainRpc};

/// One wired, runnable instance of the risk engine.
pub struct Engine {
    config: Arc<EngineConfig>,
    selection: Selection,
    bus: Arc<InMemoryEventBus>,
    sink: BusAndStdoutSink,
    quality: Arc<QualityPipeline>,
    window_manager: Arc<WindowManager>,
    reorg_handler: Arc<ReorgHandler>,
    block_monitors: HashMap<String, Arc<BlockMonitor>>,
    rpcs: HashMap<String, Arc<dyn ChainRpc>>,
    sources: Vec<Arc<dyn RiskSource>>,
}

impl Engine {
    /// Build the default wiring: one [`SimulatedChainRpc`] per selected
    /// chain, one [`BlockMonitor`] per selected chain sharing a single
    /// [`ReorgHandler`], and five simulated data sources (one per
    /// [`risk_types::SourceType`]) feeding every selected coin on every
    /// chain it trades on.
    pub fn new(config: EngineConfig, selection: Selection) -> Self {
        let config = Arc::new(config);
        let bus = Arc::new(InMemoryEventBus::new());
        let sink = BusAndStdoutSink::new(bus.clone());

        let mut rpcs: HashMap<String, Arc<dyn ChainRpc>> = HashMap::new();
        for chain_name in &selection.chains {
            let profile = &config.chains[chain_name];
            rpcs.insert(chain_name.clone(), Arc::new(SimulatedChainRpc::new(profile, 1_000_000)));
        }

        let reorg_handler = Arc::new(ReorgHandler::new());
        let mut block_monitors = HashMap::new();
        for chain_name in &selection.chains {
            let profile = &config.chains[chain_name];
            let monitor = BlockMonitor::new(chain_name.clone(), rpcs[chain_name].clone(), reorg_handler.clone(), profile.max_reorg_depth);
            block_monitors.insert(chain_name.clone(), Arc::new(monitor));
        }

        let sources: Vec<Arc<dyn RiskSource>> = vec![
            Arc::new(OnChainPriceSource::new("dex-price-feed", rpcs.clone())),
            Arc::new(OffChainMetricSource::new("liquidity-aggregator", risk_types::SourceType::Liquidity)),
            Arc::new(OffChainMetricSource::new("supply-oracle", risk_types::SourceType::Supply)),
            Arc::new(OffChainMetricSource::new("volatility-feed", risk_types::SourceType::Volatility)),
            Arc::new(OffChainMetricSource::new("sentiment-index", risk_types::SourceType::Sentiment)),
        ];

        let coins = config
            .coins
            .iter()
            .filter(|(symbol, _)| selection.coins.contains(symbol))
            .map(|(symbol, coin)| (symbol.clone(), coin.clone()))
            .collect();
        let chains = config
            .chains
            .iter()
            .filter(|(name, _)| selection.chains.contains(name))
            .map(|(name, profile)| (name.clone(), profile.clone()))
            .collect();

        let window_manager = Arc::new(WindowManager::new(config.window.clone(), config.tcs.clone(), coins, chains));
        let quality = Arc::new(QualityPipeline::new(config.quality.clone()));

        Engine {
            config,
            selection,
            bus,
            sink,
            quality,
            window_manager,
            reorg_handler,
            block_monitors,
            rpcs,
            sources,
        }
    }

    pub fn bus(&self) -> Arc<InMemoryEventBus> {
        self.bus.clone()
    }

    pub fn window_manager(&self) -> Arc<WindowManager> {
        self.window_manager.clone()
    }

    /// Run every source poller, block monitor, and the window scheduler as
    /// concurrent tasks until `shutdown` fires or `duration` elapses
    /// (§5 concurrency model: one task per poller, bounded by the number of
    /// sources and chains, no unbounded fan-out).
    pub async fn run(self: Arc<Self>, duration: Option<StdDuration>, shutdown: tokio::sync::watch::Receiver<bool>) {
        let mut handles = Vec::new();

        for chain_name in self.selection.chains.clone() {
            let engine = self.clone();
            let mut shutdown = shutdown.clone();
            handles.push(tokio::spawn(async move {
                engine.run_block_monitor(&chain_name, &mut shutdown).await;
            }));
        }

        for source in self.sources.clone() {
            let engine = self.clone();
            let mut shutdown = shutdown.clone();
            handles.push(tokio::spawn(async move {
                engine.run_source_poller(source, &mut shutdown).await;
            }));
        }

        {
            let engine = self.clone();
            let mut shutdown = shutdown.clone();
            handles.push(tokio::spawn(async move {
                engine.run_scheduler(&mut shutdown).await;
            }));
        }

        if let Some(duration) = duration {
            tokio::time::sleep(duration).await;
            info!(secs = duration.as_secs(), "run duration elapsed, shutting down");
        } else {
            let mut shutdown_wait = shutdown.clone();
            let _ = shutdown_wait.changed().await;
        }

        for handle in handles {
            handle.abort();
        }
    }

    async fn run_source_poller(&self, source: Arc<dyn RiskSource>, shutdown: &mut tokio::sync::watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(StdDuration::from_secs(5));
        loop {
            tokio::select! {
                _ = interval.tick() => {}
                _ = shutdown.changed() => return,
            }

            for coin in &self.selection.coins {
                let Some(coin_config) = self.config.coins.get(coin) else { continue };
                for chain in &coin_config.chains {
                    if !self.selection.chains.contains(chain) {
                        continue;
                    }
                    self.poll_once(source.as_ref(), coin, chain).await;
                }
            }
        }
    }

    async fn poll_once(&self, source: &dyn RiskSource, coin: &str, chain: &str) {
        let now = Utc::now();
        if self.quality.guard(source.name(), now).is_err() {
            debug!(source = source.name(), "circuit open, skipping poll");
            return;
        }

        match source.fetch(coin, chain).await {
            Ok(Some(event)) => {
                self.quality.record_outcome(source.name(), true, now);
                self.ingest(event).await;
            }
            Ok(None) => {
                self.quality.record_outcome(source.name(), true, now);
            }
            Err(err) => {
                self.quality.record_outcome(source.name(), false, now);
                warn!(source = source.name(), error = %err, "source fetch failed");
            }
        }
    }

    async fn ingest(&self, event: risk_types::RiskEvent) {
        let now = Utc::now();
        let processed = self.quality.process_events(vec![event], now);
        for event in processed {
            risk_telemetry::metrics::EVENTS_INGESTED.inc();
            if let Some(monitor) = self.block_monitors.get(&event.chain) {
                if event.is_on_chain() {
                    monitor.register_event(event.clone());
                }
            }
            self.bus.publish(RiskEngineEvent::EventIngested(event.clone())).await;
            if let Err(err) = self.window_manager.assign_event(event, now) {
                warn!(error = %err, "failed to assign event to a window");
            }
        }
    }

    async fn run_block_monitor(&self, chain_name: &str, shutdown: &mut tokio::sync::watch::Receiver<bool>) {
        let Some(monitor) = self.block_monitors.get(chain_name) else { return };
        let profile = &self.config.chains[chain_name];
        let mut interval = tokio::time::interval(profile.poll_interval());
        loop {
            tokio::select! {
                _ = interval.tick() => {}
                _ = shutdown.changed() => return,
            }

            let now = Utc::now();
            match monitor.tick(now).await {
                Ok(corrections) => {
                    for correction in corrections {
                        if let Err(err) = self.window_manager.assign_event(correction, now) {
                            warn!(error = %err, "failed to assign reorg correction to a window");
                        }
                    }
                }
                Err(err) => warn!(chain = chain_name, error = %err, "block monitor tick failed"),
            }
        }
    }

    async fn run_scheduler(&self, shutdown: &mut tokio::sync::watch::Receiver<bool>) {
        let tick_secs = self.config.window.scheduler_tick_secs;
        let mut interval = tokio::time::interval(StdDuration::from_secs(tick_secs));
        let mut ticks_since_cleanup = 0u64;
        loop {
            tokio::select! {
                _ = interval.tick() => {}
                _ = shutdown.changed() => return,
            }

            let now = Utc::now();
            let snapshots = self.window_manager.scheduler_tick(&self.rpcs, now).await;
            risk_telemetry::metrics::LIVE_WINDOWS.set(self.window_manager.live_window_count() as i64);

            for snapshot in snapshots {
                risk_telemetry::metrics::SNAPSHOTS_EMITTED.inc();
                if let Err(err) = self.sink.publish(&snapshot).await {
                    warn!(error = %err, "failed to publish finalized snapshot");
                }
            }

            ticks_since_cleanup += 1;
            if ticks_since_cleanup >= 60 {
                self.window_manager.cleanup_old_windows(now);
                ticks_since_cleanup = 0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve_selection, CliArgs};

    fn test_engine() -> Arc<Engine> {
        let config = EngineConfig::default();
        let args = CliArgs {
            coins: Some(vec!["USDC".to_string()]),
            chains: Some(vec!["ethereum".to_string()]),
            duration: None,
            config: None,
            log_level: None,
            json_logs: false,
            metrics_addr: None,
        };
        let selection = resolve_selection(&args, &config).unwrap();
        Arc::new(Engine::new(config, selection))
    }

    #[tokio::test]
    async fn poll_once_ingests_into_a_window() {
        let engine = test_engine();
        let source: Arc<dyn RiskSource> =
            Arc::new(OffChainMetricSource::new("liquidity-aggregator", risk_types::SourceType::Liquidity));
        engine.poll_once(source.as_ref(), "USDC", "ethereum").await;
        assert_eq!(engine.window_manager().live_window_count(), 1);
    }

    #[tokio::test]
    async fn run_stops_at_the_configured_duration() {
        let engine = test_engine();
        let (_tx, rx) = tokio::sync::watch::channel(false);
        let start = std::time::Instant::now();
        engine.run(Some(StdDuration::from_millis(50)), rx).await;
        assert!(start.elapsed() >= StdDuration::from_millis(50));
    }
}
