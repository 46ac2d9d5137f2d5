// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! vLLM probe: GET `/v1/models`, expecting exactly one served
//! model per backend.

use serde::Deserialize;

use crate::ollama::validate_base_url;
use llmfabric_core::ProbeError;

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

/// `GET /v1/models` — a vLLM backend serves exactly one model; anything
/// else (zero or more than one entry) is a probe failure.
pub async fn probe_single_model(client: &reqwest::Client, base_url: &str) -> Result<String, ProbeError> {
    let url = validate_base_url(base_url)?.join("v1/models").map_err(|e| ProbeError::InvalidBaseUrl(e.to_string()))?;

    let resp = client.get(url).send().await.map_err(|e| ProbeError::RemoteUnreachable(e.to_string()))?;

    if !resp.status().is_success() {
        return Err(ProbeError::RemoteRejected(format!("status {}", resp.status())));
    }

    let body: ModelsResponse =
        resp.json().await.map_err(|e| ProbeError::RemoteDecodeFailure(e.to_string()))?;

    match body.data.as_slice() {
        [single] => Ok(single.id.clone()),
        [] => Err(ProbeError::RemoteDecodeFailure("vLLM backend reported no served model".into())),
        entries => Err(ProbeError::RemoteDecodeFailure(format!(
            "vLLM backend reported {} served models, expected exactly one",
            entries.len()
        ))),
    }
}

#[cfg(test)]
#[path = "vllm_tests.rs"]
mod tests;
