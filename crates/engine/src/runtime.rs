// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `RuntimeState`: the in-memory `backendID → LLMState` map and the
//! reconciliation tick that keeps it consistent with the Store.

use std::collections::HashMap;
use std::sync::Arc;

use llmfabric_adapters::{gemini, ollama, openai, vllm};
use llmfabric_bus::Bus;
use llmfabric_core::{
    ActivityTracker, Backend, BackendType, Clock, Job, Model, NoopActivityTracker, ProviderConfig, SystemClock,
    TickError,
};
use llmfabric_store::{Cursor, Store};
use parking_lot::Mutex;

use crate::download::DownloadQueue;

/// Whether reconciliation scopes desired models globally or per-pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileMode {
    /// Every backend is reconciled against the full models table.
    Global,
    /// A backend's declared set is the union of models across every pool
    /// that references it; backends referenced by no pool are idle.
    Pool,
}

/// The reconciler: owns the in-memory state map exclusively and is the
/// only thing that ever writes to it.
///
/// Generic over the clock so tests can swap in a `FakeClock`; `Clock`
/// itself is not object-safe (it requires `Clone`), so this is a type
/// parameter rather than a trait object like `store`/`bus`/`activity`.
pub struct RuntimeState<C: Clock = SystemClock> {
    store: Arc<dyn Store>,
    bus: Arc<dyn Bus>,
    http: reqwest::Client,
    clock: C,
    activity: Arc<dyn ActivityTracker>,
    state: Mutex<HashMap<String, llmfabric_core::LLMState>>,
    tick_lock: tokio::sync::Mutex<()>,
}

const LIST_PAGE_SIZE: usize = 256;

impl RuntimeState<SystemClock> {
    pub fn new(store: Arc<dyn Store>, bus: Arc<dyn Bus>) -> Self {
        Self {
            store,
            bus,
            http: llmfabric_adapters::new_http_client(llmfabric_adapters::client::LIST_TIMEOUT),
            clock: SystemClock,
            activity: Arc::new(NoopActivityTracker),
            state: Mutex::new(HashMap::new()),
            tick_lock: tokio::sync::Mutex::new(()),
        }
    }
}

impl<C: Clock> RuntimeState<C> {
    pub fn with_clock<C2: Clock>(self, clock: C2) -> RuntimeState<C2> {
        RuntimeState {
            store: self.store,
            bus: self.bus,
            http: self.http,
            clock,
            activity: self.activity,
            state: self.state,
            tick_lock: self.tick_lock,
        }
    }

    pub fn with_activity_tracker(mut self, activity: Arc<dyn ActivityTracker>) -> Self {
        self.activity = activity;
        self
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    pub fn bus(&self) -> &Arc<dyn Bus> {
        &self.bus
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Deep-copy snapshot of the state map. Readers may call this freely
    /// while a tick is in flight; the lock is held only long enough to
    /// clone each entry out.
    pub fn get(&self) -> HashMap<String, llmfabric_core::LLMState> {
        self.state.lock().clone()
    }

    /// One full tick. Returns an error only on a Store listing
    /// failure; per-backend probe failures are recorded on that backend's
    /// state entry and never abort the tick.
    pub async fn run_backend_cycle(&self, mode: ReconcileMode) -> Result<(), TickError> {
        let _guard = self.tick_lock.lock().await;

        match mode {
            ReconcileMode::Global => self.run_global_cycle().await,
            ReconcileMode::Pool => self.run_pool_cycle().await,
        }
    }

    /// Consumes at most one queued `model_pull` job; a no-op when the
    /// queue is empty.
    pub async fn run_download_cycle(&self) -> Result<(), llmfabric_core::DownloadError> {
        let queue = DownloadQueue::new(self.store.clone(), self.bus.clone(), self.http.clone());
        match queue.pop().await? {
            Some(job) => queue.download_model(&job).await,
            None => Ok(()),
        }
    }

    async fn run_global_cycle(&self) -> Result<(), TickError> {
        let span = self.activity.start("run_backend_cycle", "global", &[]);
        let backends = self.store.list_all_backends().await?;
        let desired = self.list_all_models().await?;

        let mut live_ids = Vec::with_capacity(backends.len());
        for backend in &backends {
            live_ids.push(backend.id.to_string());
            let new_state = self.probe_backend(backend, desired.clone()).await;
            self.state.lock().insert(backend.id.to_string(), new_state);
        }

        self.evict_stale(&live_ids);
        span.end();
        Ok(())
    }

    async fn run_pool_cycle(&self) -> Result<(), TickError> {
        let span = self.activity.start("run_backend_cycle", "pool", &[]);
        let pools = self.store.list_all_pools().await?;

        let mut working: HashMap<String, (Backend, Vec<Model>)> = HashMap::new();
        for pool in &pools {
            let backends = self.store.list_backends_for_pool(&pool.id).await?;
            let models = self.store.list_models_for_pool(&pool.id).await?;

            for backend in backends {
                let entry = working.entry(backend.id.to_string()).or_insert_with(|| (backend.clone(), Vec::new()));
                for model in &models {
                    if !entry.1.iter().any(|m| m.id == model.id) {
                        entry.1.push(model.clone());
                    }
                }
            }
        }

        let mut live_ids = Vec::with_capacity(working.len());
        for (backend_id, (backend, declared)) in working {
            live_ids.push(backend_id.clone());
            let new_state = self.probe_backend(&backend, declared).await;
            self.state.lock().insert(backend_id, new_state);
        }

        // Cleanup happens only after every pool has contributed its backends,
        // so a backend shared by multiple pools is never prematurely evicted.
        self.evict_stale(&live_ids);
        span.end();
        Ok(())
    }

    fn evict_stale(&self, live_ids: &[String]) {
        let mut state = self.state.lock();
        state.retain(|id, _| live_ids.contains(id));
    }

    async fn list_all_models(&self) -> Result<Vec<Model>, llmfabric_core::StoreError> {
        let mut out = Vec::new();
        let mut cursor = Cursor::START;
        loop {
            let page = self.store.list_models(cursor, LIST_PAGE_SIZE).await?;
            out.extend(page.items);
            match page.next_cursor {
                Some(next) => cursor = next,
                None => break,
            }
        }
        Ok(out)
    }

    async fn probe_backend(&self, backend: &Backend, declared: Vec<Model>) -> llmfabric_core::LLMState {
        let mut state = llmfabric_core::LLMState::new(backend);
        state.declared_models = declared;

        match backend.backend_type {
            BackendType::Ollama => self.probe_ollama(backend, &mut state).await,
            BackendType::Vllm => self.probe_vllm(backend, &mut state).await,
            BackendType::Openai => self.probe_openai(backend, &mut state).await,
            BackendType::Gemini => self.probe_gemini(backend, &mut state).await,
        }

        state
    }

    async fn probe_ollama(&self, backend: &Backend, state: &mut llmfabric_core::LLMState) {
        if let Err(e) = ollama::validate_base_url(&backend.base_url) {
            state.error = Some(e.to_string());
            return;
        }

        let observed = match ollama::list_models(&self.http, &backend.base_url).await {
            Ok(models) => models,
            Err(e) => {
                state.error = Some(e.to_string());
                return;
            }
        };

        let declared_names: Vec<&str> = state.declared_models.iter().map(|m| m.model.as_str()).collect();

        for name in &declared_names {
            if !observed.iter().any(|o| o == name) {
                let job = Job::model_pull(backend.base_url.clone(), (*name).to_string(), self.clock.epoch_ms());
                // Queue collapses to one outstanding pull per backend; a
                // second insert against the same id is a no-op.
                let _ = self.store.append_job(job).await;
            }
        }

        for name in &observed {
            if !declared_names.contains(&name.as_str()) {
                if let Err(e) = ollama::delete_model(&self.http, &backend.base_url, name).await {
                    tracing::warn!(backend = %backend.name, model = %name, error = %e, "failed to delete surplus model");
                }
            }
        }

        match ollama::list_models(&self.http, &backend.base_url).await {
            Ok(refreshed) => state.pulled_models = refreshed,
            Err(e) => state.error = Some(e.to_string()),
        }
    }

    async fn probe_vllm(&self, backend: &Backend, state: &mut llmfabric_core::LLMState) {
        match vllm::probe_single_model(&self.http, &backend.base_url).await {
            Ok(model) => state.pulled_models = vec![model],
            Err(e) => state.error = Some(e.to_string()),
        }
    }

    async fn probe_openai(&self, backend: &Backend, state: &mut llmfabric_core::LLMState) {
        let api_key = match self.lookup_api_key("openai").await {
            Ok(key) => key,
            Err(e) => {
                state.error = Some(e.to_string());
                return;
            }
        };

        match openai::list_models(&self.http, &backend.base_url, &api_key).await {
            Ok(models) => {
                state.pulled_models = models;
                state.api_key = Some(api_key);
            }
            Err(e) => state.error = Some(e.to_string()),
        }
    }

    async fn probe_gemini(&self, backend: &Backend, state: &mut llmfabric_core::LLMState) {
        let api_key = match self.lookup_api_key("gemini").await {
            Ok(key) => key,
            Err(e) => {
                state.error = Some(e.to_string());
                return;
            }
        };

        match gemini::list_models(&self.http, &backend.base_url, &api_key).await {
            Ok(models) => {
                state.pulled_models = models;
                state.api_key = Some(api_key);
            }
            Err(e) => state.error = Some(e.to_string()),
        }
    }

    async fn lookup_api_key(&self, provider: &str) -> Result<String, llmfabric_core::ProbeError> {
        let bytes = self
            .store
            .get_kv(provider)
            .await
            .map_err(|_| llmfabric_core::ProbeError::MissingApiKey)?;
        let config: ProviderConfig =
            serde_json::from_slice(&bytes).map_err(|e| llmfabric_core::ProbeError::RemoteDecodeFailure(e.to_string()))?;
        Ok(config.api_key)
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
