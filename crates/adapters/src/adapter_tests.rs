// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use llmfabric_core::{BackendType, CapabilityFlags, LLMState, Model};

use super::*;

fn state(backend_id: &str, base_url: &str, backend_type: BackendType) -> LLMState {
    LLMState {
        backend_id: backend_id.to_string(),
        name: backend_id.to_string(),
        base_url: base_url.to_string(),
        backend_type,
        declared_models: Vec::new(),
        pulled_models: Vec::new(),
        error: None,
        api_key: None,
    }
}

#[test]
fn skips_states_with_a_recorded_error() {
    let mut s = state("b1", "http://b1", BackendType::Ollama);
    s.pulled_models = vec!["llama3".to_string()];
    s.error = Some("unreachable".to_string());

    let grouped = project(&[s]);
    assert!(grouped.is_empty());
}

#[test]
fn uses_declared_model_capabilities_when_present() {
    let model = Model::new("llama3", CapabilityFlags { can_chat: true, can_embed: false, can_prompt: true, can_stream: true }, 8192, 0);
    let mut s = state("b1", "http://b1", BackendType::Ollama);
    s.declared_models = vec![model];
    s.pulled_models = vec!["llama3".to_string()];

    let grouped = project(&[s]);
    let providers = &grouped[&BackendType::Ollama];
    assert_eq!(providers.len(), 1);
    assert!(providers[0].can_chat());
    assert_eq!(providers[0].context_length(), 8192);
}

#[test]
fn undeclared_self_hosted_model_gets_no_capabilities() {
    let mut s = state("b1", "http://b1", BackendType::Ollama);
    s.pulled_models = vec!["phi3".to_string()];

    let grouped = project(&[s]);
    let providers = &grouped[&BackendType::Ollama];
    assert!(!providers[0].can_chat());
    assert!(!providers[0].can_embed());
    assert!(!providers[0].can_prompt());
    assert!(!providers[0].can_stream());
}

#[test]
fn undeclared_hosted_model_falls_back_to_default_table() {
    let mut s = state("b1", "https://api.openai.com", BackendType::Openai);
    s.pulled_models = vec!["gpt-4o".to_string()];
    s.api_key = Some("sk-test".to_string());

    let grouped = project(&[s]);
    let providers = &grouped[&BackendType::Openai];
    assert!(providers[0].can_chat());
    assert!(providers[0].can_stream());
    assert!(!providers[0].can_embed());
}

#[test]
fn same_model_across_backends_collapses_into_one_provider_with_multiple_urls() {
    let mut s1 = state("b1", "http://b1", BackendType::Ollama);
    s1.pulled_models = vec!["llama3".to_string()];
    let mut s2 = state("b2", "http://b2", BackendType::Ollama);
    s2.pulled_models = vec!["llama3".to_string()];

    let grouped = project(&[s1, s2]);
    let providers = &grouped[&BackendType::Ollama];
    assert_eq!(providers.len(), 1);
    assert_eq!(providers[0].base_urls, vec!["http://b1".to_string(), "http://b2".to_string()]);
    assert_eq!(providers[0].backend_ids(), &["b1".to_string(), "b2".to_string()]);
}
