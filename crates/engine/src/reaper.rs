// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Leased-job reaper: reclaims jobs whose lease expired without the leaser
//! completing them, so a crashed or hung worker never strands a job
//! forever in the leased table.

use std::sync::Arc;

use llmfabric_core::StoreError;
use llmfabric_store::Store;

/// Scans every leased job once and re-queues the ones past their lease.
/// Returns the number reaped. Intended to be driven on its own interval,
/// independent of `run_backend_cycle`/`run_download_cycle`.
pub async fn run_reaper_once(store: &Arc<dyn Store>, now_ms: u64) -> Result<usize, StoreError> {
    let leased = store.list_leased_jobs().await?;
    let mut reaped = 0;

    for leased_job in leased {
        if !leased_job.is_expired(now_ms) {
            continue;
        }

        let id = leased_job.job.id.clone();
        match store.delete_leased_job(&id).await {
            Ok(()) => {}
            // Already cleared by the leaser between our list and delete.
            Err(StoreError::NotFound(_)) => continue,
            Err(e) => return Err(e),
        }

        let mut job = leased_job.job;
        job.retry_count += 1;
        store.append_job(job).await?;
        reaped += 1;
    }

    Ok(reaped)
}

#[cfg(test)]
#[path = "reaper_tests.rs"]
mod tests;
