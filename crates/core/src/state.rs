// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `LLMState`: the in-memory, per-backend reconciliation record.
//!
//! Created or overwritten each tick by the probe for that backend's type,
//! and removed from the runtime's state map once the backend disappears
//! from the Store (see engine::runtime for the map itself).

use serde::{Deserialize, Serialize};

use crate::backend::{Backend, BackendType};
use crate::model::Model;

/// Observed + declared state for one backend, as of the most recently
/// completed tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LLMState {
    pub backend_id: String,
    pub name: String,
    pub base_url: String,
    pub backend_type: BackendType,
    /// Models this backend is declared to serve (union across pools, or
    /// the global set, depending on reconciliation mode).
    pub declared_models: Vec<Model>,
    /// Model names actually observed on the remote as of the last probe.
    pub pulled_models: Vec<String>,
    /// Non-empty iff the last probe failed; `Provider Adapter`
    /// skips any `LLMState` with a non-empty error.
    pub error: Option<String>,
    /// Present only for hosted providers with a configured credential.
    /// Never logged or serialized to the wire outside the probe and the
    /// eventual provider handle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl LLMState {
    pub fn new(backend: &Backend) -> Self {
        Self {
            backend_id: backend.id.to_string(),
            name: backend.name.clone(),
            base_url: backend.base_url.clone(),
            backend_type: backend.backend_type,
            declared_models: Vec::new(),
            pulled_models: Vec::new(),
            error: None,
            api_key: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn is_healthy(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
