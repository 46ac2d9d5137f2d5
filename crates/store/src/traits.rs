// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Store` contract: transactional CRUD over backends, models,
//! pools, pool↔backend/model assignments, the job queue, leased jobs, and
//! a key-value table for provider credentials.

use async_trait::async_trait;
use llmfabric_core::{Backend, BackendId, Job, JobId, LeasedJob, Model, ModelId, Pool, PoolId, StoreError};

use crate::cursor::{Cursor, Page};

/// A reference to an owning entity, used by `DeleteJobsByEntity` to purge
/// queued work tied to something that was just deleted (e.g. a backend).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRef {
    pub entity_id: String,
    pub entity_type: String,
}

impl EntityRef {
    pub fn new(entity_id: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self { entity_id: entity_id.into(), entity_type: entity_type.into() }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    // --- Backends ---
    async fn create_backend(&self, backend: Backend) -> Result<(), StoreError>;
    async fn get_backend(&self, id: &BackendId) -> Result<Backend, StoreError>;
    async fn get_backend_by_name(&self, name: &str) -> Result<Backend, StoreError>;
    async fn update_backend(&self, backend: Backend) -> Result<(), StoreError>;
    async fn delete_backend(&self, id: &BackendId) -> Result<(), StoreError>;
    async fn list_all_backends(&self) -> Result<Vec<Backend>, StoreError>;

    // --- Models ---
    async fn append_model(&self, model: Model) -> Result<(), StoreError>;
    async fn get_model_by_id(&self, id: &ModelId) -> Result<Model, StoreError>;
    async fn get_model_by_name(&self, name: &str) -> Result<Model, StoreError>;
    async fn delete_model(&self, id: &ModelId) -> Result<(), StoreError>;
    async fn list_models(&self, cursor: Cursor, limit: usize) -> Result<Page<Model>, StoreError>;

    // --- Pools ---
    async fn create_pool(&self, pool: Pool) -> Result<(), StoreError>;
    async fn get_pool(&self, id: &PoolId) -> Result<Pool, StoreError>;
    async fn get_pool_by_name(&self, name: &str) -> Result<Pool, StoreError>;
    async fn update_pool(&self, pool: Pool) -> Result<(), StoreError>;
    async fn delete_pool(&self, id: &PoolId) -> Result<(), StoreError>;
    async fn list_all_pools(&self) -> Result<Vec<Pool>, StoreError>;
    async fn list_pools_by_purpose(&self, purpose_type: &str) -> Result<Vec<Pool>, StoreError>;

    // --- Assignments ---
    async fn assign_backend_to_pool(&self, pool_id: &PoolId, backend_id: &BackendId) -> Result<(), StoreError>;
    async fn remove_backend_from_pool(&self, pool_id: &PoolId, backend_id: &BackendId) -> Result<(), StoreError>;
    async fn assign_model_to_pool(&self, pool_id: &PoolId, model_id: &ModelId) -> Result<(), StoreError>;
    async fn remove_model_from_pool(&self, pool_id: &PoolId, model_id: &ModelId) -> Result<(), StoreError>;
    async fn list_backends_for_pool(&self, pool_id: &PoolId) -> Result<Vec<Backend>, StoreError>;
    async fn list_models_for_pool(&self, pool_id: &PoolId) -> Result<Vec<Model>, StoreError>;
    async fn list_pools_for_backend(&self, backend_id: &BackendId) -> Result<Vec<Pool>, StoreError>;
    async fn list_pools_for_model(&self, model_id: &ModelId) -> Result<Vec<Pool>, StoreError>;

    // --- Jobs ---
    async fn append_job(&self, job: Job) -> Result<(), StoreError>;
    async fn pop_job_for_type(&self, task_type: &str) -> Result<Option<Job>, StoreError>;
    async fn pop_n_jobs_for_type(&self, task_type: &str, n: usize) -> Result<Vec<Job>, StoreError>;
    async fn get_jobs_for_type(&self, task_type: &str) -> Result<Vec<Job>, StoreError>;
    async fn list_jobs(&self, cursor: Cursor, limit: usize) -> Result<Page<Job>, StoreError>;
    async fn delete_jobs_by_entity(&self, entity: &EntityRef) -> Result<(), StoreError>;

    // --- Leased jobs ---
    async fn append_leased_job(&self, job: Job, lease_duration_ms: u64, leaser: &str) -> Result<(), StoreError>;
    async fn get_leased_job(&self, id: &JobId) -> Result<LeasedJob, StoreError>;
    async fn delete_leased_job(&self, id: &JobId) -> Result<(), StoreError>;
    async fn list_leased_jobs(&self) -> Result<Vec<LeasedJob>, StoreError>;

    // --- KV ---
    async fn set_kv(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;
    async fn get_kv(&self, key: &str) -> Result<Vec<u8>, StoreError>;
    async fn delete_kv(&self, key: &str) -> Result<(), StoreError>;
    async fn list_kv(&self) -> Result<Vec<(String, Vec<u8>)>, StoreError>;
    async fn list_kv_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError>;
}
