// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pool entity: a named grouping binding backends to models.

use serde::{Deserialize, Serialize};

use crate::backend::BackendId;
use crate::model::ModelId;

crate::define_id! {
    /// Unique identifier for a declared pool.
    pub struct PoolId("pol-");
}

/// Operator-declared purpose of a pool, e.g. `"chat"`, `"embed"`, `"batch"`.
/// Kept as a plain string so operators can define their own taxonomy;
/// `ListByPurpose` filters on it.
pub type PurposeType = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub id: PoolId,
    pub name: String,
    pub purpose_type: PurposeType,
    pub created_at_epoch_ms: u64,
    pub updated_at_epoch_ms: u64,
}

impl Pool {
    pub fn new(name: impl Into<String>, purpose_type: impl Into<String>, now_ms: u64) -> Self {
        Self {
            id: PoolId::new(),
            name: name.into(),
            purpose_type: purpose_type.into(),
            created_at_epoch_ms: now_ms,
            updated_at_epoch_ms: now_ms,
        }
    }
}

/// Composite-identity assignment of a backend to a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolBackend {
    pub pool_id: PoolId,
    pub backend_id: BackendId,
}

/// Composite-identity assignment of a model to a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolModel {
    pub pool_id: PoolId,
    pub model_id: ModelId,
}
