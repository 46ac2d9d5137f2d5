// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn snapshot_path() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    (dir, path)
}

#[tokio::test]
async fn set_then_rm_round_trips_through_the_snapshot_file() {
    let (_dir, path) = snapshot_path();

    run(CredentialCommand::Set { provider: "openai".to_string(), api_key: "sk-test".to_string() }, &path)
        .await
        .unwrap();

    let store = store_io::load(&path).await.unwrap();
    let bytes = store.get_kv("openai").await.unwrap();
    let config: llmfabric_core::ProviderConfig = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(config.api_key, "sk-test");

    run(CredentialCommand::Rm { provider: "openai".to_string() }, &path).await.unwrap();
    let store = store_io::load(&path).await.unwrap();
    assert!(store.get_kv("openai").await.is_err());
}
