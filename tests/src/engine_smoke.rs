//! Smoke test for the orchestrator wiring itself (not one of S1-S6, but the
//! thing all of them assume): the default configuration resolves, the
//! engine constructs every per-chain monitor and fixture source, and a
//! bounded run terminates cleanly on its own duration.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use risk_orchestrator::config::{load_engine_config, resolve_selection, CliArgs};
    use risk_orchestrator::Engine;

    fn default_args() -> CliArgs {
        CliArgs {
            coins: None,
            chains: None,
            duration: None,
            config: None,
            log_level: None,
            json_logs: false,
            metrics_addr: None,
        }
    }

    #[test]
    fn default_config_resolves_and_validates() {
        let args = default_args();
        let config = load_engine_config(&args).unwrap();
        let selection = resolve_selection(&args, &config).unwrap();
        assert_eq!(selection.chains.len(), 3);
        assert_eq!(selection.coins.len(), 3);
    }

    #[tokio::test]
    async fn engine_runs_for_its_configured_duration_and_stops() {
        let args = default_args();
        let config = load_engine_config(&args).unwrap();
        let selection = resolve_selection(&args, &config).unwrap();
        let engine = std::sync::Arc::new(Engine::new(config, selection));

        let (_tx, rx) = tokio::sync::watch::channel(false);
        let start = std::time::Instant::now();
        engine.run(Some(Duration::from_millis(50)), rx).await;
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
