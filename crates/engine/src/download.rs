// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Download Queue: a thin wrapper over the Store's job table for
//! `model_pull` work, plus the streaming `downloadModel` driver and its
//! cancellation wiring over the Bus.

use std::sync::Arc;

use llmfabric_adapters::ollama;
use llmfabric_bus::{subjects, Bus, ModelDownloadProgress, QueueCancelMessage};
use llmfabric_core::{DownloadError, Job, JobId, StoreError};
use llmfabric_store::Store;
use tokio_util::sync::CancellationToken;

const MODEL_PULL_TASK_TYPE: &str = "model_pull";
const LEASE_DURATION_MS: u64 = 5 * 60 * 1_000;
const LEASER: &str = "download-queue";

pub struct DownloadQueue {
    store: Arc<dyn Store>,
    bus: Arc<dyn Bus>,
    http: reqwest::Client,
}

impl DownloadQueue {
    pub fn new(store: Arc<dyn Store>, bus: Arc<dyn Bus>, http: reqwest::Client) -> Self {
        Self { store, bus, http }
    }

    /// Appends a pull job whose logical identity is `backend_url`. A
    /// second `add` for a backend that already has an outstanding job is
    /// a no-op: the queue collapses to one pending pull per backend
    /// and the next tick will re-detect whatever is still missing.
    pub async fn add(&self, backend_url: &str, model: &str, now_ms: u64) -> Result<(), DownloadError> {
        let job = Job::model_pull(backend_url, model, now_ms);
        match self.store.append_job(job).await {
            Ok(()) | Err(StoreError::AlreadyExists(_)) => Ok(()),
            Err(e) => Err(DownloadError::Store(e)),
        }
    }

    /// Atomically claims the single oldest `model_pull` job and moves it
    /// into the leased table for the duration of the pull. If the caller
    /// never releases the lease (a crashed worker), the reaper reclaims it
    /// after `LEASE_DURATION_MS` and re-appends it as a fresh job.
    pub async fn pop(&self) -> Result<Option<Job>, DownloadError> {
        let Some(job) = self.store.pop_job_for_type(MODEL_PULL_TASK_TYPE).await.map_err(DownloadError::Store)? else {
            return Ok(None);
        };
        self.store.append_leased_job(job.clone(), LEASE_DURATION_MS, LEASER).await.map_err(DownloadError::Store)?;
        Ok(Some(job))
    }

    /// Drives the pull for `job`, publishing each progress line to the
    /// Bus subject `model_download` and aborting as soon as a matching
    /// `queue_cancel` message arrives.
    ///
    /// Cancellation matches either the job's backend URL or its model
    /// name: a URL match cancels this one pull, a model-name match
    /// cancels every in-flight pull of that model across all backends.
    pub async fn download_model(&self, job: &Job) -> Result<(), DownloadError> {
        let payload = job
            .model_pull_payload()
            .ok_or_else(|| DownloadError::Bus("model_pull job payload did not decode".into()))?;

        let cancel = CancellationToken::new();
        let watcher = self.spawn_cancel_watcher(payload.url.clone(), payload.model.clone(), cancel.clone());

        let base_url = payload.url.clone();
        let model = payload.model.clone();
        let bus = self.bus.clone();

        let pull = ollama::pull_model(&self.http, &base_url, &model, |line| {
            let progress = ModelDownloadProgress {
                status: line.status,
                digest: line.digest,
                total: line.total,
                completed: line.completed,
                model: model.clone(),
                base_url: base_url.clone(),
            };
            if let Ok(bytes) = serde_json::to_vec(&progress) {
                let bus = bus.clone();
                tokio::spawn(async move {
                    let _ = bus.publish(subjects::MODEL_DOWNLOAD, bytes).await;
                });
            }
        });

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(DownloadError::Cancelled),
            r = pull => r.map_err(DownloadError::from),
        };

        watcher.abort();
        self.release_lease(&job.id).await;
        result
    }

    /// Clears the lease this job was popped under, if any. A job driven
    /// straight through `download_model` without going through `pop` first
    /// (as in tests) was never leased, so a `NotFound` here is expected and
    /// not an error.
    async fn release_lease(&self, id: &JobId) {
        match self.store.delete_leased_job(id).await {
            Ok(()) | Err(StoreError::NotFound(_)) => {}
            Err(e) => tracing::warn!(error = %e, "failed to release job lease"),
        }
    }

    fn spawn_cancel_watcher(
        &self,
        url: String,
        model: String,
        cancel: CancellationToken,
    ) -> tokio::task::JoinHandle<()> {
        let bus = self.bus.clone();
        tokio::spawn(async move {
            let Ok(mut sub) = bus.stream(subjects::QUEUE_CANCEL).await else { return };
            while let Ok(payload) = sub.recv().await {
                let Ok(msg) = serde_json::from_slice::<QueueCancelMessage>(&payload) else { continue };
                if msg.id == url || msg.id == model {
                    cancel.cancel();
                    return;
                }
            }
        })
    }
}

#[cfg(test)]
#[path = "download_tests.rs"]
mod tests;
