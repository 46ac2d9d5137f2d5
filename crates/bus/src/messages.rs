// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed JSON bodies for the two subjects the core exchanges structured
//! payloads on. `trigger_cycle` carries no body.

use serde::{Deserialize, Serialize};

/// Body of a `queue_cancel` message.
///
/// `id` matches against either a job's backend URL (cancels one backend's
/// pull) or its model name (cancels every pull of that model across all
/// backends).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueCancelMessage {
    pub id: String,
}

impl QueueCancelMessage {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Body of a `model_download` progress event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDownloadProgress {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<u64>,
    pub model: String,
    pub base_url: String,
}
