// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OpenAI probe: `GET {base}/v1/models` with bearer auth.
//!
//! The API key itself is an engine-level concern (looked up from the
//! `openai` KV entry by the caller); this module only needs the key value,
//! never the Store.

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

/// `GET {base}/v1/models` with `Authorization: Bearer <api_key>`.
///
/// `api_key` being absent is the caller's responsibility to detect and
/// report as `ProbeError::MissingApiKey` before calling this; this
/// function always sends whatever key it is given.
pub async fn list_models(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
) -> Result<Vec<String>, ProbeError> {
    let url = validate_base_url(base_url)?.join("v1/models").map_err(|e| ProbeError::InvalidBaseUrl(e.to_string()))?;

    let resp = client
        .get(url)
        .bearer_auth(api_key)
        .send()
        .await
        .map_err(|e| ProbeError::RemoteUnreachable(e.to_string()))?;

    if !resp.status().is_success() {
        return Err(ProbeError::RemoteRejected(format!("status {}", resp.status())));
    }

    let body: ModelsResponse =
        resp.json().await.map_err(|e| ProbeError::RemoteDecodeFailure(e.to_string()))?;
    Ok(body.data.into_iter().map(|m| m.id).collect())
}

#[cfg(test)]
#[path = "openai_tests.rs"]
mod tests;
