// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The tick loop driver: runs `RunBackendCycle`/`RunDownloadCycle` on
//! their configured intervals behind a circuit breaker, drives the
//! leased-job reaper and the snapshot-persist tick on their own intervals,
//! and listens on `trigger_cycle` for operator-forced ticks.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use llmfabric_bus::{subjects, Bus};
use llmfabric_core::{Clock, StoreError, SystemClock};
use llmfabric_engine::{CircuitBreaker, ReconcileMode, RuntimeState};
use llmfabric_store::{MemoryStore, Store};
use tokio_util::sync::CancellationToken;

use crate::config::Config;

pub struct Scheduler {
    runtime: Arc<RuntimeState<SystemClock>>,
    store: Arc<dyn Store>,
    memory_store: Arc<MemoryStore>,
    bus: Arc<dyn Bus>,
    config: Config,
}

impl Scheduler {
    /// `memory_store` backs both the generic `Store` operations the tick
    /// and reaper loops run against and the concrete snapshot export/import
    /// the persist loop below needs; it is always the same store passed to
    /// `RuntimeState::new`.
    pub fn new(
        runtime: Arc<RuntimeState<SystemClock>>,
        memory_store: Arc<MemoryStore>,
        bus: Arc<dyn Bus>,
        config: Config,
    ) -> Self {
        let store: Arc<dyn Store> = memory_store.clone();
        Self { runtime, store, memory_store, bus, config }
    }

    /// Runs all five loops until `shutdown` is cancelled.
    pub async fn run(self, shutdown: CancellationToken) {
        let circuit = Arc::new(CircuitBreaker::new(self.config.circuit_failure_threshold, self.config.circuit_reset_after));

        let tick = self.spawn_tick_loop(circuit.clone(), shutdown.clone());
        let download = self.spawn_download_loop(shutdown.clone());
        let reaper = self.spawn_reaper_loop(shutdown.clone());
        let trigger = self.spawn_trigger_listener(circuit, shutdown.clone());
        let snapshot = self.spawn_snapshot_loop(shutdown.clone());

        let _ = tokio::join!(tick, download, reaper, trigger, snapshot);
    }

    fn spawn_tick_loop(&self, circuit: Arc<CircuitBreaker>, shutdown: CancellationToken) -> tokio::task::JoinHandle<()> {
        let runtime = self.runtime.clone();
        let mode = self.config.reconcile_mode;
        let interval = self.config.tick_interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => return,
                    _ = ticker.tick() => run_tick_once(&runtime, &circuit, mode).await,
                }
            }
        })
    }

    fn spawn_download_loop(&self, shutdown: CancellationToken) -> tokio::task::JoinHandle<()> {
        let runtime = self.runtime.clone();
        let interval = self.config.download_poll_interval;
        tokio::spawn(async move {
            loop {
                if shutdown.is_cancelled() {
                    return;
                }
                if let Err(e) = runtime.run_download_cycle().await {
                    tracing::warn!(error = %e, "download cycle failed");
                }
                tokio::select! {
                    _ = shutdown.cancelled() => return,
                    _ = tokio::time::sleep(interval) => {}
                }
            }
        })
    }

    fn spawn_reaper_loop(&self, shutdown: CancellationToken) -> tokio::task::JoinHandle<()> {
        let store = self.store.clone();
        let interval = self.config.reaper_interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => return,
                    _ = ticker.tick() => {
                        let now_ms = SystemClock.epoch_ms();
                        match llmfabric_engine::run_reaper_once(&store, now_ms).await {
                            Ok(n) if n > 0 => tracing::info!(reaped = n, "leased-job reaper requeued expired jobs"),
                            Ok(_) => {}
                            Err(e) => tracing::warn!(error = %e, "leased-job reaper failed, retrying next interval"),
                        }
                    }
                }
            }
        })
    }

    /// Reloads any externally-declared backends/models/pools (e.g. from a
    /// CLI invocation run while the daemon is up) and re-saves the merged
    /// state on `snapshot_interval`, so a crash only loses what changed
    /// since the last tick instead of everything since the last clean
    /// shutdown. A no-op loop when no `snapshot_path` is configured.
    fn spawn_snapshot_loop(&self, shutdown: CancellationToken) -> tokio::task::JoinHandle<()> {
        let Some(path) = self.config.snapshot_path.clone() else {
            return tokio::spawn(async {});
        };
        let memory_store = self.memory_store.clone();
        let interval = self.config.snapshot_interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => return,
                    _ = ticker.tick() => {
                        if let Err(e) = reload_snapshot(&memory_store, &path).await {
                            tracing::warn!(error = %e, path = %path.display(), "failed to reload store snapshot");
                        }
                        if let Err(e) = save_snapshot(&memory_store, &path).await {
                            tracing::warn!(error = %e, path = %path.display(), "failed to persist store snapshot");
                        }
                    }
                }
            }
        })
    }

    fn spawn_trigger_listener(&self, circuit: Arc<CircuitBreaker>, shutdown: CancellationToken) -> tokio::task::JoinHandle<()> {
        let runtime = self.runtime.clone();
        let bus = self.bus.clone();
        let mode = self.config.reconcile_mode;
        tokio::spawn(async move {
            let mut sub = match bus.stream(subjects::TRIGGER_CYCLE).await {
                Ok(sub) => sub,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to subscribe to trigger_cycle; force-ticks disabled");
                    return;
                }
            };
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => return,
                    msg = sub.recv() => {
                        if msg.is_err() {
                            return;
                        }
                        run_tick_once(&runtime, &circuit, mode).await;
                    }
                }
            }
        })
    }
}

async fn run_tick_once(runtime: &RuntimeState<SystemClock>, circuit: &CircuitBreaker, mode: ReconcileMode) {
    if !circuit.allow() {
        tracing::debug!("circuit open, skipping tick");
        return;
    }

    match runtime.run_backend_cycle(mode).await {
        Ok(()) => circuit.record_success(),
        Err(e) => {
            circuit.record_failure();
            tracing::error!(error = %e, "backend cycle failed");
        }
    }
}

/// Parses the snapshot file at `path` (a no-op if it doesn't exist yet) and
/// merges it into `store`. Existing rows are left untouched: `load_snapshot`
/// tolerates `AlreadyExists`, so this only picks up rows declared since the
/// last reload. It never removes a row the snapshot no longer lists.
pub async fn reload_snapshot(store: &MemoryStore, path: &Path) -> Result<(), StoreError> {
    if !path.exists() {
        return Ok(());
    }
    let bytes = tokio::fs::read(path).await.map_err(io_err)?;
    let snapshot: llmfabric_store::Snapshot = serde_json::from_slice(&bytes).map_err(io_err)?;
    store.load_snapshot(snapshot).await
}

pub async fn save_snapshot(store: &MemoryStore, path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    let snapshot = store.export_snapshot().await?;
    let bytes = serde_json::to_vec_pretty(&snapshot).map_err(io_err)?;
    tokio::fs::write(path, bytes).await.map_err(io_err)
}

fn io_err(e: impl std::fmt::Display) -> StoreError {
    StoreError::Backend(e.to_string())
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
