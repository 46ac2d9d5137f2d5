// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk snapshot of `MemoryStore`'s declared entities (backends,
//! paths for the in-memory store snapshot file"). Lets the daemon and the
//! CLI share declared backends/models/pools/credentials across process
//! restarts without a real database. The job queue is intentionally left
//! out: it is transient work, not declared configuration, and a process
//! restart losing in-flight pulls is acceptable (the next tick re-detects
//! whatever is still missing).

use llmfabric_core::{Backend, BackendId, Model, ModelId, Pool, PoolId, StoreError};
use serde::{Deserialize, Serialize};

use crate::cursor::Cursor;
use crate::memory::MemoryStore;
use crate::traits::Store;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub backends: Vec<Backend>,
    pub models: Vec<Model>,
    pub pools: Vec<Pool>,
    pub pool_backends: Vec<(PoolId, BackendId)>,
    pub pool_models: Vec<(PoolId, ModelId)>,
    pub kv: Vec<(String, Vec<u8>)>,
}

impl MemoryStore {
    pub async fn export_snapshot(&self) -> Result<Snapshot, StoreError> {
        let backends = self.list_all_backends().await?;
        let models = self.list_all_models().await?;
        let pools = self.list_all_pools().await?;

        let mut pool_backends = Vec::new();
        let mut pool_models = Vec::new();
        for pool in &pools {
            for backend in self.list_backends_for_pool(&pool.id).await? {
                pool_backends.push((pool.id, backend.id));
            }
            for model in self.list_models_for_pool(&pool.id).await? {
                pool_models.push((pool.id, model.id));
            }
        }

        let kv = self.list_kv().await?;

        Ok(Snapshot { backends, models, pools, pool_backends, pool_models, kv })
    }

    /// Populates an empty store from a previously exported snapshot.
    /// `AlreadyExists` for an individual row is tolerated so callers can
    /// re-apply a snapshot onto a partially populated store idempotently.
    pub async fn load_snapshot(&self, snapshot: Snapshot) -> Result<(), StoreError> {
        for backend in snapshot.backends {
            match self.create_backend(backend).await {
                Ok(()) | Err(StoreError::AlreadyExists(_)) => {}
                Err(e) => return Err(e),
            }
        }
        for model in snapshot.models {
            match self.append_model(model).await {
                Ok(()) | Err(StoreError::AlreadyExists(_)) => {}
                Err(e) => return Err(e),
            }
        }
        for pool in snapshot.pools {
            match self.create_pool(pool).await {
                Ok(()) | Err(StoreError::AlreadyExists(_)) => {}
                Err(e) => return Err(e),
            }
        }
        for (pool_id, backend_id) in snapshot.pool_backends {
            self.assign_backend_to_pool(&pool_id, &backend_id).await?;
        }
        for (pool_id, model_id) in snapshot.pool_models {
            self.assign_model_to_pool(&pool_id, &model_id).await?;
        }
        for (key, value) in snapshot.kv {
            self.set_kv(&key, value).await?;
        }
        Ok(())
    }

    async fn list_all_models(&self) -> Result<Vec<Model>, StoreError> {
        let mut out = Vec::new();
        let mut cursor = Cursor::START;
        loop {
            let page = self.list_models(cursor, 256).await?;
            out.extend(page.items);
            match page.next_cursor {
                Some(next) => cursor = next,
                None => break,
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
