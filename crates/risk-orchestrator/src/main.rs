//! Binary entry point for the risk engine (grounded in the teacher's
//! `node-runtime::main`: parse config, init logging, run until shutdown).

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use risk_orchestrator::{config, CliArgs, Engine};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    let telemetry_config = config::load_telemetry_config(&args);
    let _telemetry_guard = match risk_telemetry::init_telemetry(&telemetry_config) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("failed to initialize telemetry: {err}");
            std::process::exit(1);
        }
    };

    let engine_config = match config::load_engine_config(&args) {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "invalid configuration");
            std::process::exit(1);
        }
    };

    let selection = match config::resolve_selection(&args, &engine_config) {
        Ok(selection) => selection,
        Err(err) => {
            error!(error = %err, "invalid --coins/--chains selection");
            std::process::exit(1);
        }
    };

    info!(
        coins = ?selection.coins,
        chains = ?selection.chains,
        "starting risk engine"
    );

    let engine = Arc::new(Engine::new(engine_config, selection));
    let duration = args.duration.map(|d| Duration::from_secs(d.0));

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            let _ = shutdown_tx.send(true);
        }
    });

    engine.run(duration, shutdown_rx).await;
    info!("risk engine stopped");
}
