// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use llmfabric_bus::InMemoryBus;
use llmfabric_core::{Backend, BackendType, CapabilityFlags, Model, Pool};
use llmfabric_store::MemoryStore;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

fn tags_mock(server: &MockServer, names: &[&str]) -> wiremock::Mock {
    let models: Vec<_> = names.iter().map(|n| serde_json::json!({"name": n})).collect();
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"models": models})))
}

#[tokio::test]
async fn e1_pool_aggregation_unions_models_across_pools() {
    let server1 = MockServer::start().await;
    let server2 = MockServer::start().await;
    tags_mock(&server1, &["m", "n"]).mount(&server1).await;
    tags_mock(&server2, &["m"]).mount(&server2).await;

    let store = Arc::new(MemoryStore::new());
    let bus = Arc::new(InMemoryBus::new());

    let b1 = Backend::new("b1", server1.uri(), BackendType::Ollama, 0);
    let b2 = Backend::new("b2", server2.uri(), BackendType::Ollama, 0);
    store.create_backend(b1.clone()).await.unwrap();
    store.create_backend(b2.clone()).await.unwrap();

    let model_m = Model::new("m", CapabilityFlags::ALL, 4096, 0);
    let model_n = Model::new("n", CapabilityFlags::ALL, 4096, 0);
    store.append_model(model_m.clone()).await.unwrap();
    store.append_model(model_n.clone()).await.unwrap();

    let pool1 = Pool::new("p1", "chat", 0);
    let pool2 = Pool::new("p2", "chat", 0);
    store.create_pool(pool1.clone()).await.unwrap();
    store.create_pool(pool2.clone()).await.unwrap();
    store.assign_backend_to_pool(&pool1.id, &b1.id).await.unwrap();
    store.assign_backend_to_pool(&pool1.id, &b2.id).await.unwrap();
    store.assign_model_to_pool(&pool1.id, &model_m.id).await.unwrap();
    store.assign_backend_to_pool(&pool2.id, &b1.id).await.unwrap();
    store.assign_model_to_pool(&pool2.id, &model_n.id).await.unwrap();

    let runtime = RuntimeState::new(store.clone(), bus);
    runtime.run_backend_cycle(ReconcileMode::Pool).await.unwrap();

    let snapshot = runtime.get();
    let b1_state = &snapshot[&b1.id.to_string()];
    let b2_state = &snapshot[&b2.id.to_string()];

    let mut b1_declared: Vec<&str> = b1_state.declared_models.iter().map(|m| m.model.as_str()).collect();
    b1_declared.sort_unstable();
    assert_eq!(b1_declared, vec!["m", "n"]);

    let b2_declared: Vec<&str> = b2_state.declared_models.iter().map(|m| m.model.as_str()).collect();
    assert_eq!(b2_declared, vec!["m"]);

    store.delete_pool(&pool2.id).await.unwrap();
    runtime.run_backend_cycle(ReconcileMode::Pool).await.unwrap();
    let snapshot = runtime.get();
    let b1_state = &snapshot[&b1.id.to_string()];
    assert_eq!(b1_state.declared_models.iter().map(|m| m.model.as_str()).collect::<Vec<_>>(), vec!["m"]);
    assert!(snapshot.contains_key(&b2.id.to_string()));
}

#[tokio::test]
async fn stale_backend_is_evicted_after_removal_from_store() {
    let server = MockServer::start().await;
    tags_mock(&server, &[]).mount(&server).await;

    let store = Arc::new(MemoryStore::new());
    let bus = Arc::new(InMemoryBus::new());
    let backend = Backend::new("b1", server.uri(), BackendType::Ollama, 0);
    store.create_backend(backend.clone()).await.unwrap();

    let runtime = RuntimeState::new(store.clone(), bus);
    runtime.run_backend_cycle(ReconcileMode::Global).await.unwrap();
    assert!(runtime.get().contains_key(&backend.id.to_string()));

    store.delete_backend(&backend.id).await.unwrap();
    runtime.run_backend_cycle(ReconcileMode::Global).await.unwrap();
    assert!(!runtime.get().contains_key(&backend.id.to_string()));
}

#[tokio::test]
async fn e7_missing_openai_api_key_yields_error_state_with_no_pulled_models() {
    let store = Arc::new(MemoryStore::new());
    let bus = Arc::new(InMemoryBus::new());
    let backend = Backend::new("openai-1", "https://api.openai.com", BackendType::Openai, 0);
    store.create_backend(backend.clone()).await.unwrap();

    let runtime = RuntimeState::new(store, bus);
    runtime.run_backend_cycle(ReconcileMode::Global).await.unwrap();

    let snapshot = runtime.get();
    let state = &snapshot[&backend.id.to_string()];
    assert_eq!(state.error.as_deref(), Some("API key not configured"));
    assert!(state.pulled_models.is_empty());
}

#[tokio::test]
async fn e2_ollama_tick_enqueues_pull_then_settles_once_remote_catches_up() {
    let server = MockServer::start().await;
    tags_mock(&server, &[]).mount(&server).await;

    let store = Arc::new(MemoryStore::new());
    let bus = Arc::new(InMemoryBus::new());
    let backend = Backend::new("b1", server.uri(), BackendType::Ollama, 0);
    store.create_backend(backend.clone()).await.unwrap();
    let model = Model::new("m", CapabilityFlags::ALL, 4096, 0);
    store.append_model(model).await.unwrap();

    let runtime = RuntimeState::new(store.clone(), bus);
    runtime.run_backend_cycle(ReconcileMode::Global).await.unwrap();

    let jobs = store.get_jobs_for_type("model_pull").await.unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].model_pull_payload().unwrap().model, "m");
}

#[tokio::test]
async fn vllm_state_always_has_exactly_one_pulled_model() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{"id": "served-model"}]
        })))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let bus = Arc::new(InMemoryBus::new());
    let backend = Backend::new("v1", server.uri(), BackendType::Vllm, 0);
    store.create_backend(backend.clone()).await.unwrap();

    let runtime = RuntimeState::new(store, bus);
    runtime.run_backend_cycle(ReconcileMode::Global).await.unwrap();

    let snapshot = runtime.get();
    let state = &snapshot[&backend.id.to_string()];
    assert_eq!(state.pulled_models, vec!["served-model".to_string()]);
}
