// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Model entity: a declared model name, its capability hints, and context
//! length, plus name normalization used by the resolver's candidate match.

use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a declared model.
    pub struct ModelId("mdl-");
}

/// Capability hints carried on a `Model` and projected onto provider
/// handles by the adapter. Never mutated by the adapter itself — see
/// capability overrides seen elsewhere (`WithChat(true)`-style), which this design
/// forbids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityFlags {
    pub can_chat: bool,
    pub can_embed: bool,
    pub can_prompt: bool,
    pub can_stream: bool,
}

impl CapabilityFlags {
    pub const NONE: CapabilityFlags =
        CapabilityFlags { can_chat: false, can_embed: false, can_prompt: false, can_stream: false };

    pub const ALL: CapabilityFlags =
        CapabilityFlags { can_chat: true, can_embed: true, can_prompt: true, can_stream: true };
}

/// An operator-declared model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub id: ModelId,
    /// Canonical name as reported by / requested of the backend, unique.
    pub model: String,
    pub capabilities: CapabilityFlags,
    pub context_length: u32,
    pub created_at_epoch_ms: u64,
    pub updated_at_epoch_ms: u64,
}

impl Model {
    pub fn new(model: impl Into<String>, capabilities: CapabilityFlags, context_length: u32, now_ms: u64) -> Self {
        Self {
            id: ModelId::new(),
            model: model.into(),
            capabilities,
            context_length,
            created_at_epoch_ms: now_ms,
            updated_at_epoch_ms: now_ms,
        }
    }
}

/// Known quantization suffixes stripped during normalization.
const QUANT_SUFFIXES: &[&str] = &["awq", "gptq", "4bit", "fp16"];

/// Normalize a model name for fuzzy resolver matching.
///
/// Lower-cases, strips whitespace/`-`/`_`/`.`, drops any organisation
/// prefix before the first `/`, drops a trailing `:tag`, and drops a
/// trailing known quantisation suffix.
pub fn normalize_model_name(name: &str) -> String {
    let lower = name.to_lowercase();
    let without_org = match lower.split_once('/') {
        Some((_, rest)) => rest,
        None => &lower,
    };
    let without_tag = match without_org.split_once(':') {
        Some((base, _tag)) => base,
        None => without_org,
    };

    let mut cleaned: String =
        without_tag.chars().filter(|c| !c.is_whitespace() && *c != '-' && *c != '_' && *c != '.').collect();

    for suffix in QUANT_SUFFIXES {
        if let Some(stripped) = cleaned.strip_suffix(suffix) {
            cleaned = stripped.to_string();
            break;
        }
    }

    cleaned
}

/// True if two model names match exactly or under normalization.
pub fn model_names_match(a: &str, b: &str) -> bool {
    a == b || normalize_model_name(a) == normalize_model_name(b)
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
