// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ollama probe: list/pull/delete against the native `/api/*`
//! surface.

use futures_util::StreamExt;
use llmfabric_core::ProbeError;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

/// Parse `base_url` as a valid absolute URL, or fail with `InvalidBaseUrl`.
pub fn validate_base_url(base_url: &str) -> Result<reqwest::Url, ProbeError> {
    reqwest::Url::parse(base_url).map_err(|e| ProbeError::InvalidBaseUrl(format!("{base_url}: {e}")))
}

/// `GET /api/tags` — model names currently pulled onto this backend.
pub async fn list_models(client: &reqwest::Client, base_url: &str) -> Result<Vec<String>, ProbeError> {
    let url = validate_base_url(base_url)?.join("api/tags").map_err(|e| ProbeError::InvalidBaseUrl(e.to_string()))?;

    let resp = client.get(url).send().await.map_err(|e| ProbeError::RemoteUnreachable(e.to_string()))?;

    if !resp.status().is_success() {
        return Err(ProbeError::RemoteRejected(format!("status {}", resp.status())));
    }

    let body: TagsResponse =
        resp.json().await.map_err(|e| ProbeError::RemoteDecodeFailure(e.to_string()))?;
    Ok(body.models.into_iter().map(|m| m.name).collect())
}

/// `DELETE /api/delete` — remove a model the backend serves that is no
/// longer declared.
pub async fn delete_model(client: &reqwest::Client, base_url: &str, model: &str) -> Result<(), ProbeError> {
    let url = validate_base_url(base_url)?.join("api/delete").map_err(|e| ProbeError::InvalidBaseUrl(e.to_string()))?;

    let resp = client
        .delete(url)
        .json(&json!({ "name": model }))
        .send()
        .await
        .map_err(|e| ProbeError::RemoteUnreachable(e.to_string()))?;

    if !resp.status().is_success() {
        return Err(ProbeError::RemoteRejected(format!("status {}", resp.status())));
    }
    Ok(())
}

/// One line of the NDJSON stream `POST /api/pull` emits.
#[derive(Debug, Clone, Deserialize)]
pub struct PullProgressLine {
    pub status: String,
    #[serde(default)]
    pub digest: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub completed: Option<u64>,
}

/// `POST /api/pull` — stream pull progress, invoking `on_progress` per
/// NDJSON line. Returns once the backend reports the pull complete or the
/// connection ends.
///
/// The caller drives cancellation by racing this future against a
/// cancellation signal (see `engine::download`); this function has no
/// cancellation token of its own.
pub async fn pull_model(
    client: &reqwest::Client,
    base_url: &str,
    model: &str,
    mut on_progress: impl FnMut(PullProgressLine),
) -> Result<(), ProbeError> {
    let url = validate_base_url(base_url)?.join("api/pull").map_err(|e| ProbeError::InvalidBaseUrl(e.to_string()))?;

    let resp = client
        .post(url)
        .json(&json!({ "name": model, "stream": true }))
        .send()
        .await
        .map_err(|e| ProbeError::RemoteUnreachable(e.to_string()))?;

    if !resp.status().is_success() {
        return Err(ProbeError::RemoteRejected(format!("status {}", resp.status())));
    }

    let mut stream = resp.bytes_stream();
    let mut buf = Vec::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| ProbeError::RemoteUnreachable(e.to_string()))?;
        buf.extend_from_slice(&chunk);
        while let Some(pos) = buf.iter().position(|b| *b == b'\n') {
            let line = buf.drain(..=pos).collect::<Vec<u8>>();
            let line = &line[..line.len().saturating_sub(1)];
            if line.is_empty() {
                continue;
            }
            let parsed: PullProgressLine =
                serde_json::from_slice(line).map_err(|e| ProbeError::RemoteDecodeFailure(e.to_string()))?;
            on_progress(parsed);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "ollama_tests.rs"]
mod tests;
