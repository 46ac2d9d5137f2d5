// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Provider` capability interface and the capability-typed
//! client traits a resolved provider hands back.

use async_trait::async_trait;
use llmfabric_core::{BackendType, CapabilityFlags};
use thiserror::Error;

/// A capability-tagged handle to one `(backendType, modelName)` pair,
/// possibly served by more than one backend URL.
///
/// Immutable once produced by [`crate::adapter::project`]; the resolver
/// never mutates a `Provider`, only selects among a slice of them.
#[derive(Debug, Clone, PartialEq)]
pub struct Provider {
    pub id: String,
    pub model_name: String,
    pub backend_type: BackendType,
    pub base_urls: Vec<String>,
    pub backend_ids: Vec<String>,
    pub capabilities: CapabilityFlags,
    pub context_length: u32,
    pub api_key: Option<String>,
}

impl Provider {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn backend_ids(&self) -> &[String] {
        &self.backend_ids
    }

    pub fn context_length(&self) -> u32 {
        self.context_length
    }

    pub fn can_chat(&self) -> bool {
        self.capabilities.can_chat
    }

    pub fn can_embed(&self) -> bool {
        self.capabilities.can_embed
    }

    pub fn can_prompt(&self) -> bool {
        self.capabilities.can_prompt
    }

    pub fn can_stream(&self) -> bool {
        self.capabilities.can_stream
    }

    /// A concrete, resolved handle bound to one of this provider's
    /// backend URLs, as produced by a selection policy.
    pub fn handle_at(&self, base_url: String) -> ProviderHandle {
        ProviderHandle {
            model_name: self.model_name.clone(),
            backend_type: self.backend_type,
            base_url,
            api_key: self.api_key.clone(),
        }
    }
}

/// One resolved `(provider, backendURL, modelName)` triple, bound to a
/// single backend URL by the policy. This is what a capability-typed
/// client is constructed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderHandle {
    pub model_name: String,
    pub backend_type: BackendType,
    pub base_url: String,
    pub api_key: Option<String>,
}

/// Errors a capability-typed client can raise while actually talking to
/// the backend. Distinct from `ProbeError`: this is the live request
/// path, not reconciliation.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("backend unreachable: {0}")]
    Unreachable(String),
    #[error("backend rejected request: {0}")]
    Rejected(String),
    #[error("failed to decode backend response: {0}")]
    DecodeFailure(String),
}

#[async_trait]
pub trait LLMChatClient: Send + Sync {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<ChatMessage, ClientError>;
}

#[async_trait]
pub trait LLMEmbedClient: Send + Sync {
    async fn embed(&self, input: &str) -> Result<Vec<f32>, ClientError>;
}

#[async_trait]
pub trait LLMPromptExecClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ClientError>;
}

#[async_trait]
pub trait LLMStreamClient: Send + Sync {
    /// Streams completion chunks, invoking `on_chunk` per piece of text
    /// as it arrives.
    async fn stream(&self, prompt: &str, on_chunk: &mut (dyn FnMut(&str) + Send)) -> Result<(), ClientError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// A generic HTTP-backed implementation of the four capability client
/// traits, parameterised only by the resolved handle. Per-backend-type
/// wire framing lives in `ollama`/`vllm`/`openai`/`gemini`; this struct
/// is the thing the resolver actually returns to a caller.
pub struct HttpProviderClient {
    client: reqwest::Client,
    handle: ProviderHandle,
}

impl HttpProviderClient {
    pub fn new(client: reqwest::Client, handle: ProviderHandle) -> Self {
        Self { client, handle }
    }

    pub fn handle(&self) -> &ProviderHandle {
        &self.handle
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url, ClientError> {
        reqwest::Url::parse(&self.handle.base_url)
            .and_then(|u| u.join(path))
            .map_err(|e| ClientError::Rejected(format!("invalid base url: {e}")))
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match (&self.handle.api_key, self.handle.backend_type) {
            (Some(key), BackendType::Openai) => builder.bearer_auth(key),
            (Some(key), BackendType::Gemini) => builder.header("X-Goog-Api-Key", key),
            _ => builder,
        }
    }
}

#[async_trait]
impl LLMChatClient for HttpProviderClient {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<ChatMessage, ClientError> {
        let url = self.endpoint("v1/chat/completions")?;
        let body = serde_json::json!({
            "model": self.handle.model_name,
            "messages": messages.iter().map(|m| serde_json::json!({"role": m.role, "content": m.content})).collect::<Vec<_>>(),
        });

        let resp = self
            .authed(self.client.post(url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::Unreachable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ClientError::Rejected(format!("status {}", resp.status())));
        }

        let parsed: serde_json::Value =
            resp.json().await.map_err(|e| ClientError::DecodeFailure(e.to_string()))?;
        let content = parsed["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| ClientError::DecodeFailure("missing choices[0].message.content".into()))?;
        Ok(ChatMessage { role: "assistant".to_string(), content: content.to_string() })
    }
}

#[async_trait]
impl LLMEmbedClient for HttpProviderClient {
    async fn embed(&self, input: &str) -> Result<Vec<f32>, ClientError> {
        let url = self.endpoint("v1/embeddings")?;
        let body = serde_json::json!({ "model": self.handle.model_name, "input": input });

        let resp = self
            .authed(self.client.post(url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::Unreachable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ClientError::Rejected(format!("status {}", resp.status())));
        }

        let parsed: serde_json::Value =
            resp.json().await.map_err(|e| ClientError::DecodeFailure(e.to_string()))?;
        let values = parsed["data"][0]["embedding"]
            .as_array()
            .ok_or_else(|| ClientError::DecodeFailure("missing data[0].embedding".into()))?;
        values
            .iter()
            .map(|v| v.as_f64().map(|f| f as f32).ok_or_else(|| ClientError::DecodeFailure("non-numeric embedding value".into())))
            .collect()
    }
}

#[async_trait]
impl LLMPromptExecClient for HttpProviderClient {
    async fn complete(&self, prompt: &str) -> Result<String, ClientError> {
        let url = self.endpoint("v1/completions")?;
        let body = serde_json::json!({ "model": self.handle.model_name, "prompt": prompt });

        let resp = self
            .authed(self.client.post(url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::Unreachable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ClientError::Rejected(format!("status {}", resp.status())));
        }

        let parsed: serde_json::Value =
            resp.json().await.map_err(|e| ClientError::DecodeFailure(e.to_string()))?;
        parsed["choices"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ClientError::DecodeFailure("missing choices[0].text".into()))
    }
}

#[async_trait]
impl LLMStreamClient for HttpProviderClient {
    async fn stream(&self, prompt: &str, on_chunk: &mut (dyn FnMut(&str) + Send)) -> Result<(), ClientError> {
        use futures_util::StreamExt;

        let url = self.endpoint("v1/completions")?;
        let body = serde_json::json!({ "model": self.handle.model_name, "prompt": prompt, "stream": true });

        let resp = self
            .authed(self.client.post(url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::Unreachable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ClientError::Rejected(format!("status {}", resp.status())));
        }

        let mut byte_stream = resp.bytes_stream();
        let mut buf = Vec::new();
        while let Some(chunk) = byte_stream.next().await {
            let chunk = chunk.map_err(|e| ClientError::Unreachable(e.to_string()))?;
            buf.extend_from_slice(&chunk);
            while let Some(pos) = buf.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buf.drain(..=pos).collect();
                let line = String::from_utf8_lossy(&line);
                let line = line.trim().trim_start_matches("data:").trim();
                if line.is_empty() || line == "[DONE]" {
                    continue;
                }
                let parsed: serde_json::Value =
                    serde_json::from_str(line).map_err(|e| ClientError::DecodeFailure(e.to_string()))?;
                if let Some(text) = parsed["choices"][0]["text"].as_str() {
                    on_chunk(text);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
