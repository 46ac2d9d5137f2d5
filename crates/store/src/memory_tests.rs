// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use llmfabric_core::{Backend, BackendType, CapabilityFlags, Model, Pool, StoreError};

fn store() -> MemoryStore {
    MemoryStore::new()
}

#[tokio::test]
async fn create_and_get_backend_round_trips() {
    let s = store();
    let backend = Backend::builder().name("ollama-1").base_url("http://localhost:11434").build();
    s.create_backend(backend.clone()).await.unwrap();

    let fetched = s.get_backend(&backend.id).await.unwrap();
    assert_eq!(fetched, backend);

    let by_name = s.get_backend_by_name("ollama-1").await.unwrap();
    assert_eq!(by_name, backend);
}

#[tokio::test]
async fn create_backend_duplicate_name_rejected() {
    let s = store();
    let a = Backend::builder().name("dup").build();
    let b = Backend::builder().name("dup").build();
    s.create_backend(a).await.unwrap();
    let err = s.create_backend(b).await.unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists(_)));
}

#[tokio::test]
async fn get_missing_backend_is_not_found() {
    let s = store();
    let err = s.get_backend_by_name("nope").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn delete_backend_cascades_pool_assignment() {
    let s = store();
    let backend = Backend::builder().build();
    s.create_backend(backend.clone()).await.unwrap();
    let pool = Pool::new("chat", "chat", 0);
    s.create_pool(pool.clone()).await.unwrap();
    s.assign_backend_to_pool(&pool.id, &backend.id).await.unwrap();
    assert_eq!(s.list_backends_for_pool(&pool.id).await.unwrap().len(), 1);

    s.delete_backend(&backend.id).await.unwrap();
    assert!(s.list_backends_for_pool(&pool.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_model_cascades_pool_assignment() {
    let s = store();
    let pool = Pool::new("chat", "chat", 0);
    s.create_pool(pool.clone()).await.unwrap();
    let model = Model::builder().model("llama3").capabilities(CapabilityFlags::ALL).build();
    s.append_model(model.clone()).await.unwrap();
    s.assign_model_to_pool(&pool.id, &model.id).await.unwrap();
    assert_eq!(s.list_models_for_pool(&pool.id).await.unwrap().len(), 1);

    s.delete_model(&model.id).await.unwrap();
    assert!(s.list_models_for_pool(&pool.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_models_paginates() {
    let s = store();
    for i in 0..5 {
        let model = Model::builder().model(format!("m{i}")).build();
        s.append_model(model).await.unwrap();
    }
    let page1 = s.list_models(Cursor::START, 2).await.unwrap();
    assert_eq!(page1.items.len(), 2);
    assert!(page1.next_cursor.is_some());

    let page2 = s.list_models(page1.next_cursor.unwrap(), 2).await.unwrap();
    assert_eq!(page2.items.len(), 2);

    let page3 = s.list_models(page2.next_cursor.unwrap(), 2).await.unwrap();
    assert_eq!(page3.items.len(), 1);
    assert!(page3.next_cursor.is_none());
}

#[tokio::test]
async fn append_job_duplicate_id_fails() {
    let s = store();
    let job = Job::model_pull("http://localhost:11434", "llama3", 0);
    s.append_job(job.clone()).await.unwrap();
    let err = s.append_job(job).await.unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists(_)));
}

#[tokio::test]
async fn append_job_duplicate_of_leased_fails() {
    let s = store();
    let job = Job::model_pull("http://localhost:11434", "llama3", 0);
    s.append_leased_job(job.clone(), 5_000, "worker-1").await.unwrap();
    let err = s.append_job(job).await.unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists(_)));
}

#[tokio::test]
async fn pop_job_for_type_is_fifo() {
    let s = store();
    let a = Job::model_pull("http://a", "m1", 1);
    let b = Job::model_pull("http://b", "m2", 2);
    s.append_job(a.clone()).await.unwrap();
    s.append_job(b.clone()).await.unwrap();

    let popped = s.pop_job_for_type("model_pull").await.unwrap().unwrap();
    assert_eq!(popped.id, a.id);

    let popped2 = s.pop_job_for_type("model_pull").await.unwrap().unwrap();
    assert_eq!(popped2.id, b.id);

    assert!(s.pop_job_for_type("model_pull").await.unwrap().is_none());
}

#[tokio::test]
async fn leased_job_round_trips_and_deletes() {
    let s = store();
    let job = Job::model_pull("http://localhost:11434", "llama3", 1_000);
    s.append_leased_job(job.clone(), 5_000, "worker-1").await.unwrap();

    let leased = s.get_leased_job(&job.id).await.unwrap();
    assert_eq!(leased.leaser, "worker-1");
    assert!(!leased.is_expired(2_000));
    assert!(leased.is_expired(6_000));

    s.delete_leased_job(&job.id).await.unwrap();
    assert!(matches!(s.get_leased_job(&job.id).await.unwrap_err(), StoreError::NotFound(_)));
}

#[tokio::test]
async fn delete_jobs_by_entity_purges_matching_backend_pulls() {
    let s = store();
    let a = Job::model_pull("http://a", "m1", 1);
    let b = Job::model_pull("http://b", "m2", 2);
    s.append_job(a.clone()).await.unwrap();
    s.append_job(b.clone()).await.unwrap();

    s.delete_jobs_by_entity(&EntityRef::new("http://a", "backend")).await.unwrap();

    let remaining = s.get_jobs_for_type("model_pull").await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, b.id);
}

#[tokio::test]
async fn kv_round_trips_and_lists_by_prefix() {
    let s = store();
    s.set_kv("provider/openai", b"secret".to_vec()).await.unwrap();
    s.set_kv("provider/gemini", b"other".to_vec()).await.unwrap();
    s.set_kv("unrelated", b"x".to_vec()).await.unwrap();

    assert_eq!(s.get_kv("provider/openai").await.unwrap(), b"secret".to_vec());

    let prefixed = s.list_kv_prefix("provider/").await.unwrap();
    assert_eq!(prefixed.len(), 2);

    s.delete_kv("unrelated").await.unwrap();
    assert_eq!(s.list_kv().await.unwrap().len(), 2);
}

#[tokio::test]
async fn list_pools_by_purpose_filters() {
    let s = store();
    s.create_pool(Pool::new("chat-a", "chat", 0)).await.unwrap();
    s.create_pool(Pool::new("chat-b", "chat", 0)).await.unwrap();
    s.create_pool(Pool::new("embed-a", "embed", 0)).await.unwrap();

    let chat_pools = s.list_pools_by_purpose("chat").await.unwrap();
    assert_eq!(chat_pools.len(), 2);
}

#[tokio::test]
async fn backend_type_round_trips_through_store() {
    let s = store();
    let backend = Backend::builder().backend_type(BackendType::Vllm).build();
    s.create_backend(backend.clone()).await.unwrap();
    let fetched = s.get_backend(&backend.id).await.unwrap();
    assert_eq!(fetched.backend_type, BackendType::Vllm);
}
