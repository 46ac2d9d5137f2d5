// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job queue entities.
//!
//! Unlike the other entities, a `Job`'s id is not randomly generated: for
//! `model_pull` jobs it is the backend's base URL (this is how
//! the queue collapses to one outstanding pull per backend). `JobId` is
//! therefore a plain string newtype rather than a `define_id!` type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a queued job. For `model_pull` tasks this is the backend's
/// `base_url`; other task types may use any caller-chosen unique string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// The kind of deferred work a `Job` represents.
///
/// `ModelPull` is the only task type the core reconciler enqueues; `Other`
/// keeps the queue usable for unrelated deferred work without widening this
/// enum every time a caller needs a new kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskType {
    ModelPull,
    Other(String),
}

impl TaskType {
    pub fn as_str(&self) -> &str {
        match self {
            TaskType::ModelPull => "model_pull",
            TaskType::Other(s) => s,
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload for a `model_pull` job, carried as opaque bytes in `Job::payload`
/// but given a typed accessor here since the core both produces and
/// consumes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelPullPayload {
    pub url: String,
    pub model: String,
}

/// A queued unit of deferred work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub task_type: TaskType,
    /// Opaque to the store; the core (de)serializes it as JSON.
    pub payload: Vec<u8>,
    pub scheduled_for_epoch_ms: u64,
    pub valid_until_epoch_ms: Option<u64>,
    pub retry_count: u32,
    pub created_at_epoch_ms: u64,
}

impl Job {
    pub fn model_pull(backend_url: impl Into<String>, model: impl Into<String>, now_ms: u64) -> Self {
        let backend_url = backend_url.into();
        let payload = ModelPullPayload { url: backend_url.clone(), model: model.into() };
        Self {
            id: JobId::new(backend_url),
            task_type: TaskType::ModelPull,
            payload: serde_json::to_vec(&payload).unwrap_or_default(),
            scheduled_for_epoch_ms: now_ms,
            valid_until_epoch_ms: None,
            retry_count: 0,
            created_at_epoch_ms: now_ms,
        }
    }

    /// Decode `payload` as a `model_pull` job's `{url, model}` body.
    pub fn model_pull_payload(&self) -> Option<ModelPullPayload> {
        serde_json::from_slice(&self.payload).ok()
    }
}

/// A `Job` claimed by a worker, with an exclusive lease.
///
/// A `LeasedJob` and a `Job` with the same id never coexist: `pop` removes
/// the `Job` row atomically with creating this one, and completion (or the
/// reaper re-enqueueing on lease expiry) removes this row in turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeasedJob {
    pub job: Job,
    pub leaser: String,
    pub lease_expiration_epoch_ms: u64,
}

impl LeasedJob {
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.lease_expiration_epoch_ms
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
