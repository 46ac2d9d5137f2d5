// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Gemini probe: `GET {base}/v1beta/models` with the
//! `X-Goog-Api-Key` header.

use serde::Deserialize;

use crate::ollama::validate_base_url;
use llmfabric_core::ProbeError;

const API_KEY_HEADER: &str = "X-Goog-Api-Key";

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    name: String,
}

/// `GET {base}/v1beta/models` with `X-Goog-Api-Key: <api_key>`.
pub async fn list_models(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
) -> Result<Vec<String>, ProbeError> {
    let url =
        validate_base_url(base_url)?.join("v1beta/models").map_err(|e| ProbeError::InvalidBaseUrl(e.to_string()))?;

    let resp = client
        .get(url)
        .header(API_KEY_HEADER, api_key)
        .send()
        .await
        .map_err(|e| ProbeError::RemoteUnreachable(e.to_string()))?;

    if !resp.status().is_success() {
        return Err(ProbeError::RemoteRejected(format!("status {}", resp.status())));
    }

    let body: ModelsResponse =
        resp.json().await.map_err(|e| ProbeError::RemoteDecodeFailure(e.to_string()))?;
    Ok(body.models.into_iter().map(|m| m.name).collect())
}

#[cfg(test)]
#[path = "gemini_tests.rs"]
mod tests;
