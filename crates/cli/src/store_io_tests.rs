// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use llmfabric_core::{Backend, BackendType};
use llmfabric_store::Store;

use super::*;

#[tokio::test]
async fn loading_a_missing_path_returns_an_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    let store = load(&path).await.unwrap();
    assert!(store.list_all_backends().await.unwrap().is_empty());
}

#[tokio::test]
async fn a_saved_store_round_trips_through_a_fresh_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("store.json");

    let store = MemoryStore::new();
    let backend = Backend::new("b1", "http://h1", BackendType::Ollama, 0);
    store.create_backend(backend).await.unwrap();
    save(&store, &path).await.unwrap();

    let reloaded = load(&path).await.unwrap();
    assert_eq!(reloaded.list_all_backends().await.unwrap().len(), 1);
}
