// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backend entity: an addressable LLM service instance.

use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a declared backend.
    pub struct BackendId("bck-");
}

/// The wire protocol a backend speaks.
///
/// Ollama and vLLM are self-hosted; OpenAI and Gemini are hosted providers
/// reached over their public API. The reconciler's probe dispatch and the
/// resolver's capability defaults both switch on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendType {
    Ollama,
    Vllm,
    Openai,
    Gemini,
}

crate::simple_display! {
    BackendType {
        Ollama => "ollama",
        Vllm => "vllm",
        Openai => "openai",
        Gemini => "gemini",
    }
}

impl BackendType {
    /// True for backends the reconciler may mutate (pull/delete models).
    pub fn is_self_hosted(self) -> bool {
        matches!(self, BackendType::Ollama | BackendType::Vllm)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BackendType::Ollama => "ollama",
            BackendType::Vllm => "vllm",
            BackendType::Openai => "openai",
            BackendType::Gemini => "gemini",
        }
    }
}

impl std::str::FromStr for BackendType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ollama" => Ok(BackendType::Ollama),
            "vllm" => Ok(BackendType::Vllm),
            "openai" => Ok(BackendType::Openai),
            "gemini" => Ok(BackendType::Gemini),
            other => Err(format!("unknown backend type: {other}")),
        }
    }
}

/// An operator-declared LLM backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backend {
    pub id: BackendId,
    /// Unique human-readable name.
    pub name: String,
    /// Unique base URL, e.g. `http://localhost:11434`.
    pub base_url: String,
    pub backend_type: BackendType,
    pub created_at_epoch_ms: u64,
    pub updated_at_epoch_ms: u64,
}

impl Backend {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, backend_type: BackendType, now_ms: u64) -> Self {
        Self {
            id: BackendId::new(),
            name: name.into(),
            base_url: base_url.into(),
            backend_type,
            created_at_epoch_ms: now_ms,
            updated_at_epoch_ms: now_ms,
        }
    }
}

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;
