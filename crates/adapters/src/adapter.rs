// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Provider Adapter: the pure `snapshot → (backendType → [Provider])`
//! projection. No I/O, no Store, no clock — a function of its inputs only.

use std::collections::HashMap;

use llmfabric_core::{BackendType, CapabilityFlags, LLMState};

use crate::provider::Provider;

/// Default capability table for hosted providers whose models carry no
/// declared `Model` entity for self-hosted backends, and a per-model default table for hosted
/// providers). Self-hosted backends never consult this table; their
/// capability always comes from the matching declared `Model`.
///
/// Conservative by construction: every entry here is chat + stream only,
/// matching what OpenAI's and Gemini's `/chat/completions`-shaped APIs
/// actually support for a generic listed model. A model family needing
/// embed or raw-prompt capability must be declared explicitly.
fn hosted_default_capabilities(backend_type: BackendType, model_name: &str) -> CapabilityFlags {
    match backend_type {
        BackendType::Openai if model_name.starts_with("text-embedding") => CapabilityFlags {
            can_chat: false,
            can_embed: true,
            can_prompt: false,
            can_stream: false,
        },
        BackendType::Openai | BackendType::Gemini => {
            CapabilityFlags { can_chat: true, can_embed: false, can_prompt: true, can_stream: true }
        }
        BackendType::Ollama | BackendType::Vllm => CapabilityFlags::NONE,
    }
}

/// Project a tick's observed state into capability-tagged provider
/// handles, grouped by backend type.
///
/// Skips any `LLMState` with a non-empty error. For each model the
/// backend reports as pulled, capability is taken from the matching
/// declared `Model` (by exact name) when one exists; for hosted
/// providers with no matching declared `Model`, the default table above
/// is consulted. Anything else is emitted with `CapabilityFlags::NONE` —
/// the adapter never fabricates a capability it cannot justify.
///
/// A `(backendType, modelName)` pair observed on more than one backend
/// collapses into a single `Provider` carrying every backend URL it was
/// seen on, so the resolver's policy can
/// pick among them; the resolver deduplicates candidates by provider ID,
/// which is exactly this pair.
pub fn project(states: &[LLMState]) -> HashMap<BackendType, Vec<Provider>> {
    let mut by_key: HashMap<(BackendType, String), Provider> = HashMap::new();
    let mut order: Vec<(BackendType, String)> = Vec::new();

    for state in states {
        if state.error.is_some() {
            continue;
        }

        for model_name in &state.pulled_models {
            let declared = state.declared_models.iter().find(|m| &m.model == model_name);

            let (capabilities, context_length) = match declared {
                Some(model) => (model.capabilities, model.context_length),
                None => (hosted_default_capabilities(state.backend_type, model_name), 0),
            };

            let key = (state.backend_type, model_name.clone());
            let entry = by_key.entry(key.clone()).or_insert_with(|| {
                order.push(key.clone());
                Provider {
                    id: format!("{}:{}", state.backend_type, model_name),
                    model_name: model_name.clone(),
                    backend_type: state.backend_type,
                    base_urls: Vec::new(),
                    backend_ids: Vec::new(),
                    capabilities,
                    context_length,
                    api_key: state.api_key.clone(),
                }
            });

            if !entry.base_urls.contains(&state.base_url) {
                entry.base_urls.push(state.base_url.clone());
            }
            if !entry.backend_ids.contains(&state.backend_id) {
                entry.backend_ids.push(state.backend_id.clone());
            }
        }
    }

    let mut grouped: HashMap<BackendType, Vec<Provider>> = HashMap::new();
    for key in order {
        if let Some(provider) = by_key.remove(&key) {
            grouped.entry(key.0).or_default().push(provider);
        }
    }
    grouped
}

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod tests;
