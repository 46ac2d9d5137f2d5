// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy shared by the reconciler, resolver, and their collaborators.
//!
//! Per-backend probe failures (`ProbeError`) are deliberately kept separate
//! from the errors a tick can return (`TickError`): the reconciler records
//! the former on the affected `LLMState` entry and always continues to the
//! next backend, while the latter aborts the whole tick.

use thiserror::Error;

/// Errors from a single backend-type probe (Ollama/vLLM/OpenAI/Gemini).
///
/// Recorded verbatim (via `Display`) into `LLMState::error`; never
/// propagated out of `RunBackendCycle`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    #[error("backend unreachable: {0}")]
    RemoteUnreachable(String),
    #[error("backend rejected request: {0}")]
    RemoteRejected(String),
    #[error("failed to decode backend response: {0}")]
    RemoteDecodeFailure(String),
    #[error("API key not configured")]
    MissingApiKey,
}

/// Errors that can abort a reconciliation tick.
///
/// Only the listing calls (enumerating backends/pools/models) can produce
/// these; everything else is local to a backend and becomes a `ProbeError`.
#[derive(Debug, Error)]
pub enum TickError {
    #[error("store failure: {0}")]
    StoreFailure(#[from] StoreError),
}

/// Errors surfaced by the `Store` collaborator.
///
/// `NotFound` is distinguished from all other failures per the contract in
/// the external interfaces section: callers branch on it (e.g. the download
/// queue's reaper treats a missing leased job as a normal race, not a bug).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("backing store failure: {0}")]
    Backend(String),
}

/// Errors from the download queue and its `downloadModel` driver.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("store failure: {0}")]
    Store(#[from] StoreError),
    #[error("bus failure: {0}")]
    Bus(String),
    #[error("download cancelled")]
    Cancelled,
    #[error(transparent)]
    Probe(#[from] ProbeError),
}

/// Errors from the capability-aware resolver.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolverError {
    #[error("no available models for provider types {0:?}")]
    NoAvailableModels(Vec<String>),

    #[error("no satisfactory model: {diagnostic}")]
    NoSatisfactoryModel {
        diagnostic: String,
        rejected: Vec<RejectedCandidate>,
    },

    #[error("unknown selection policy: {0}")]
    UnknownPolicy(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// One rejected resolver candidate, carried for operator diagnostics.
///
/// Rendered by the CLI's `resolve` command as a table: id, model, context
/// length, capability bits, and why it didn't match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedCandidate {
    pub provider_id: String,
    pub model_name: String,
    pub context_length: u32,
    pub can_chat: bool,
    pub can_embed: bool,
    pub can_prompt: bool,
    pub can_stream: bool,
    pub reason: String,
}
