// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Loads and saves the shared `MemoryStore` snapshot file a command
//! operates against. Every command call is a fresh process: load, mutate
//! or inspect, save.

use std::path::Path;

use anyhow::Context;
use llmfabric_store::MemoryStore;

pub async fn load(path: &Path) -> anyhow::Result<MemoryStore> {
    let store = MemoryStore::new();
    if !path.exists() {
        return Ok(store);
    }
    let bytes = tokio::fs::read(path).await.with_context(|| format!("reading {}", path.display()))?;
    let snapshot: llmfabric_store::Snapshot =
        serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))?;
    store.load_snapshot(snapshot).await.context("loading snapshot into store")?;
    Ok(store)
}

pub async fn save(store: &MemoryStore, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.with_context(|| format!("creating {}", parent.display()))?;
    }
    let snapshot = store.export_snapshot().await.context("exporting snapshot")?;
    let bytes = serde_json::to_vec_pretty(&snapshot).context("serializing snapshot")?;
    tokio::fs::write(path, bytes).await.with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
#[path = "store_io_tests.rs"]
mod tests;
