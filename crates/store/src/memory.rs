// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory `Store` implementation: one `parking_lot::Mutex` guarding a
//! handful of insertion-ordered maps. Readers take a snapshot by copying
//! each entry out under the lock, per the locking convention used
//! throughout the reconciler.

use std::collections::HashSet;

use async_trait::async_trait;
use indexmap::IndexMap;
use llmfabric_core::{Backend, BackendId, Job, JobId, LeasedJob, Model, ModelId, Pool, PoolId, StoreError};
use parking_lot::Mutex;

use crate::cursor::{Cursor, Page};
use crate::traits::{EntityRef, Store};

#[derive(Default)]
struct Inner {
    backends: IndexMap<BackendId, Backend>,
    backend_names: std::collections::HashMap<String, BackendId>,

    models: IndexMap<ModelId, Model>,
    model_names: std::collections::HashMap<String, ModelId>,

    pools: IndexMap<PoolId, Pool>,
    pool_names: std::collections::HashMap<String, PoolId>,

    pool_backends: HashSet<(PoolId, BackendId)>,
    pool_models: HashSet<(PoolId, ModelId)>,

    jobs: IndexMap<JobId, Job>,
    leased_jobs: IndexMap<JobId, LeasedJob>,

    kv: std::collections::HashMap<String, Vec<u8>>,
}

/// Reference `Store` implementation backed by process memory.
///
/// Nothing here survives a restart; it exists so the reconciler, download
/// queue, and resolver can be exercised in tests and so the CLI has
/// something to run against without a database.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self { inner: Mutex::new(Inner::default()) }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(what: &str, id: impl std::fmt::Display) -> StoreError {
    StoreError::NotFound(format!("{what} {id}"))
}

#[async_trait]
impl Store for MemoryStore {
    // --- Backends ---

    async fn create_backend(&self, backend: Backend) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if inner.backends.contains_key(&backend.id) {
            return Err(StoreError::AlreadyExists(format!("backend {}", backend.id)));
        }
        if inner.backend_names.contains_key(&backend.name) {
            return Err(StoreError::AlreadyExists(format!("backend name {}", backend.name)));
        }
        inner.backend_names.insert(backend.name.clone(), backend.id);
        inner.backends.insert(backend.id, backend);
        Ok(())
    }

    async fn get_backend(&self, id: &BackendId) -> Result<Backend, StoreError> {
        let inner = self.inner.lock();
        inner.backends.get(id).cloned().ok_or_else(|| not_found("backend", id))
    }

    async fn get_backend_by_name(&self, name: &str) -> Result<Backend, StoreError> {
        let inner = self.inner.lock();
        let id = inner.backend_names.get(name).ok_or_else(|| not_found("backend", name))?;
        inner.backends.get(id).cloned().ok_or_else(|| not_found("backend", name))
    }

    async fn update_backend(&self, backend: Backend) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if !inner.backends.contains_key(&backend.id) {
            return Err(not_found("backend", backend.id));
        }
        let old_name = inner.backends.get(&backend.id).map(|b| b.name.clone());
        if let Some(old_name) = old_name {
            if old_name != backend.name {
                inner.backend_names.remove(&old_name);
                inner.backend_names.insert(backend.name.clone(), backend.id);
            }
        }
        inner.backends.insert(backend.id, backend);
        Ok(())
    }

    async fn delete_backend(&self, id: &BackendId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let backend = inner.backends.shift_remove(id).ok_or_else(|| not_found("backend", id))?;
        inner.backend_names.remove(&backend.name);
        inner.pool_backends.retain(|(_, b)| b != id);
        Ok(())
    }

    async fn list_all_backends(&self) -> Result<Vec<Backend>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner.backends.values().cloned().collect())
    }

    // --- Models ---

    async fn append_model(&self, model: Model) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if inner.models.contains_key(&model.id) {
            return Err(StoreError::AlreadyExists(format!("model {}", model.id)));
        }
        if inner.model_names.contains_key(&model.model) {
            return Err(StoreError::AlreadyExists(format!("model name {}", model.model)));
        }
        inner.model_names.insert(model.model.clone(), model.id);
        inner.models.insert(model.id, model);
        Ok(())
    }

    async fn get_model_by_id(&self, id: &ModelId) -> Result<Model, StoreError> {
        let inner = self.inner.lock();
        inner.models.get(id).cloned().ok_or_else(|| not_found("model", id))
    }

    async fn get_model_by_name(&self, name: &str) -> Result<Model, StoreError> {
        let inner = self.inner.lock();
        let id = inner.model_names.get(name).ok_or_else(|| not_found("model", name))?;
        inner.models.get(id).cloned().ok_or_else(|| not_found("model", name))
    }

    async fn delete_model(&self, id: &ModelId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let model = inner.models.shift_remove(id).ok_or_else(|| not_found("model", id))?;
        inner.model_names.remove(&model.model);
        inner.pool_models.retain(|(_, m)| m != id);
        Ok(())
    }

    async fn list_models(&self, cursor: Cursor, limit: usize) -> Result<Page<Model>, StoreError> {
        let inner = self.inner.lock();
        Ok(paginate(inner.models.values(), cursor, limit))
    }

    // --- Pools ---

    async fn create_pool(&self, pool: Pool) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if inner.pools.contains_key(&pool.id) {
            return Err(StoreError::AlreadyExists(format!("pool {}", pool.id)));
        }
        if inner.pool_names.contains_key(&pool.name) {
            return Err(StoreError::AlreadyExists(format!("pool name {}", pool.name)));
        }
        inner.pool_names.insert(pool.name.clone(), pool.id);
        inner.pools.insert(pool.id, pool);
        Ok(())
    }

    async fn get_pool(&self, id: &PoolId) -> Result<Pool, StoreError> {
        let inner = self.inner.lock();
        inner.pools.get(id).cloned().ok_or_else(|| not_found("pool", id))
    }

    async fn get_pool_by_name(&self, name: &str) -> Result<Pool, StoreError> {
        let inner = self.inner.lock();
        let id = inner.pool_names.get(name).ok_or_else(|| not_found("pool", name))?;
        inner.pools.get(id).cloned().ok_or_else(|| not_found("pool", name))
    }

    async fn update_pool(&self, pool: Pool) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if !inner.pools.contains_key(&pool.id) {
            return Err(not_found("pool", pool.id));
        }
        let old_name = inner.pools.get(&pool.id).map(|p| p.name.clone());
        if let Some(old_name) = old_name {
            if old_name != pool.name {
                inner.pool_names.remove(&old_name);
                inner.pool_names.insert(pool.name.clone(), pool.id);
            }
        }
        inner.pools.insert(pool.id, pool);
        Ok(())
    }

    async fn delete_pool(&self, id: &PoolId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let pool = inner.pools.shift_remove(id).ok_or_else(|| not_found("pool", id))?;
        inner.pool_names.remove(&pool.name);
        inner.pool_backends.retain(|(p, _)| p != id);
        inner.pool_models.retain(|(p, _)| p != id);
        Ok(())
    }

    async fn list_all_pools(&self) -> Result<Vec<Pool>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner.pools.values().cloned().collect())
    }

    async fn list_pools_by_purpose(&self, purpose_type: &str) -> Result<Vec<Pool>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner.pools.values().filter(|p| p.purpose_type == purpose_type).cloned().collect())
    }

    // --- Assignments ---

    async fn assign_backend_to_pool(&self, pool_id: &PoolId, backend_id: &BackendId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if !inner.pools.contains_key(pool_id) {
            return Err(not_found("pool", pool_id));
        }
        if !inner.backends.contains_key(backend_id) {
            return Err(not_found("backend", backend_id));
        }
        inner.pool_backends.insert((*pool_id, *backend_id));
        Ok(())
    }

    async fn remove_backend_from_pool(&self, pool_id: &PoolId, backend_id: &BackendId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.pool_backends.remove(&(*pool_id, *backend_id));
        Ok(())
    }

    async fn assign_model_to_pool(&self, pool_id: &PoolId, model_id: &ModelId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if !inner.pools.contains_key(pool_id) {
            return Err(not_found("pool", pool_id));
        }
        if !inner.models.contains_key(model_id) {
            return Err(not_found("model", model_id));
        }
        inner.pool_models.insert((*pool_id, *model_id));
        Ok(())
    }

    async fn remove_model_from_pool(&self, pool_id: &PoolId, model_id: &ModelId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.pool_models.remove(&(*pool_id, *model_id));
        Ok(())
    }

    async fn list_backends_for_pool(&self, pool_id: &PoolId) -> Result<Vec<Backend>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner
            .pool_backends
            .iter()
            .filter(|(p, _)| p == pool_id)
            .filter_map(|(_, b)| inner.backends.get(b).cloned())
            .collect())
    }

    async fn list_models_for_pool(&self, pool_id: &PoolId) -> Result<Vec<Model>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner
            .pool_models
            .iter()
            .filter(|(p, _)| p == pool_id)
            .filter_map(|(_, m)| inner.models.get(m).cloned())
            .collect())
    }

    async fn list_pools_for_backend(&self, backend_id: &BackendId) -> Result<Vec<Pool>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner
            .pool_backends
            .iter()
            .filter(|(_, b)| b == backend_id)
            .filter_map(|(p, _)| inner.pools.get(p).cloned())
            .collect())
    }

    async fn list_pools_for_model(&self, model_id: &ModelId) -> Result<Vec<Pool>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner
            .pool_models
            .iter()
            .filter(|(_, m)| m == model_id)
            .filter_map(|(p, _)| inner.pools.get(p).cloned())
            .collect())
    }

    // --- Jobs ---

    async fn append_job(&self, job: Job) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if inner.jobs.contains_key(&job.id) || inner.leased_jobs.contains_key(&job.id) {
            return Err(StoreError::AlreadyExists(format!("job {}", job.id)));
        }
        inner.jobs.insert(job.id.clone(), job);
        Ok(())
    }

    async fn pop_job_for_type(&self, task_type: &str) -> Result<Option<Job>, StoreError> {
        let mut inner = self.inner.lock();
        let id = inner.jobs.iter().find(|(_, j)| j.task_type.as_str() == task_type).map(|(id, _)| id.clone());
        match id {
            Some(id) => Ok(inner.jobs.shift_remove(&id)),
            None => Ok(None),
        }
    }

    async fn pop_n_jobs_for_type(&self, task_type: &str, n: usize) -> Result<Vec<Job>, StoreError> {
        let mut inner = self.inner.lock();
        let ids: Vec<JobId> =
            inner.jobs.iter().filter(|(_, j)| j.task_type.as_str() == task_type).take(n).map(|(id, _)| id.clone()).collect();
        Ok(ids.into_iter().filter_map(|id| inner.jobs.shift_remove(&id)).collect())
    }

    async fn get_jobs_for_type(&self, task_type: &str) -> Result<Vec<Job>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner.jobs.values().filter(|j| j.task_type.as_str() == task_type).cloned().collect())
    }

    async fn list_jobs(&self, cursor: Cursor, limit: usize) -> Result<Page<Job>, StoreError> {
        let inner = self.inner.lock();
        Ok(paginate(inner.jobs.values(), cursor, limit))
    }

    async fn delete_jobs_by_entity(&self, entity: &EntityRef) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.jobs.retain(|_, job| !job_references_entity(job, entity));
        inner.leased_jobs.retain(|_, leased| !job_references_entity(&leased.job, entity));
        Ok(())
    }

    // --- Leased jobs ---

    async fn append_leased_job(&self, job: Job, lease_duration_ms: u64, leaser: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if inner.leased_jobs.contains_key(&job.id) {
            return Err(StoreError::AlreadyExists(format!("leased job {}", job.id)));
        }
        let lease_expiration_epoch_ms = job.scheduled_for_epoch_ms.saturating_add(lease_duration_ms);
        let id = job.id.clone();
        inner.leased_jobs.insert(id, LeasedJob { job, leaser: leaser.to_string(), lease_expiration_epoch_ms });
        Ok(())
    }

    async fn get_leased_job(&self, id: &JobId) -> Result<LeasedJob, StoreError> {
        let inner = self.inner.lock();
        inner.leased_jobs.get(id).cloned().ok_or_else(|| not_found("leased job", id))
    }

    async fn delete_leased_job(&self, id: &JobId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.leased_jobs.shift_remove(id).ok_or_else(|| not_found("leased job", id))?;
        Ok(())
    }

    async fn list_leased_jobs(&self) -> Result<Vec<LeasedJob>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner.leased_jobs.values().cloned().collect())
    }

    // --- KV ---

    async fn set_kv(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.kv.insert(key.to_string(), value);
        Ok(())
    }

    async fn get_kv(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let inner = self.inner.lock();
        inner.kv.get(key).cloned().ok_or_else(|| not_found("kv", key))
    }

    async fn delete_kv(&self, key: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.kv.remove(key).ok_or_else(|| not_found("kv", key))?;
        Ok(())
    }

    async fn list_kv(&self) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner.kv.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    async fn list_kv_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner.kv.iter().filter(|(k, _)| k.starts_with(prefix)).map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

fn job_references_entity(job: &Job, entity: &EntityRef) -> bool {
    match entity.entity_type.as_str() {
        "backend" => job.model_pull_payload().map(|p| p.url == entity.entity_id).unwrap_or(false),
        _ => false,
    }
}

fn paginate<'a, T: Clone + 'a>(items: impl Iterator<Item = &'a T>, cursor: Cursor, limit: usize) -> Page<T> {
    let all: Vec<&T> = items.collect();
    let start = cursor.0 as usize;
    let end = (start + limit).min(all.len());
    let page_items: Vec<T> = all.get(start..end).map(|s| s.iter().map(|t| (*t).clone()).collect()).unwrap_or_default();
    let next_cursor = if end < all.len() { Some(Cursor(end as u64)) } else { None };
    Page { items: page_items, next_cursor }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
