// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use llmfabric_bus::InMemoryBus;
use llmfabric_daemon::{Config, Scheduler};
use llmfabric_engine::RuntimeState;
use llmfabric_store::MemoryStore;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    llmfabric_daemon::logging::init();

    let config_path = std::env::var("LLMFABRIC_CONFIG_PATH").ok().map(std::path::PathBuf::from);
    let config = match Config::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "failed to load configuration");
            std::process::exit(1);
        }
    };

    let memory_store = Arc::new(MemoryStore::new());
    if let Some(path) = &config.snapshot_path {
        if let Err(e) = llmfabric_daemon::scheduler::reload_snapshot(&memory_store, path).await {
            tracing::warn!(error = %e, path = %path.display(), "failed to load store snapshot, starting empty");
        }
    }

    let store: Arc<dyn llmfabric_store::Store> = memory_store.clone();
    let bus: Arc<dyn llmfabric_bus::Bus> = Arc::new(InMemoryBus::new());
    let runtime = Arc::new(RuntimeState::new(store, bus.clone()));

    let shutdown = CancellationToken::new();
    let snapshot_path = config.snapshot_path.clone();
    let scheduler = Scheduler::new(runtime, memory_store.clone(), bus, config);

    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("shutdown signal received, draining loops");
        shutdown_for_signal.cancel();
    });

    scheduler.run(shutdown).await;

    if let Some(path) = snapshot_path {
        if let Err(e) = llmfabric_daemon::scheduler::save_snapshot(&memory_store, &path).await {
            tracing::warn!(error = %e, path = %path.display(), "failed to save store snapshot on shutdown");
        }
    }
}
