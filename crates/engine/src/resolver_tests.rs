// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use llmfabric_core::{BackendType, CapabilityFlags};

use super::*;

fn provider(id: &str, model: &str, backend_type: BackendType, caps: CapabilityFlags, ctx: u32, urls: &[&str]) -> Provider {
    Provider {
        id: id.to_string(),
        model_name: model.to_string(),
        backend_type,
        base_urls: urls.iter().map(|u| u.to_string()).collect(),
        backend_ids: vec!["b1".to_string()],
        capabilities: caps,
        context_length: ctx,
        api_key: None,
    }
}

#[test]
fn parse_accepts_known_policies_and_rejects_reserved_low_prio() {
    assert_eq!(SelectionPolicy::parse("random").unwrap(), SelectionPolicy::Random);
    assert_eq!(SelectionPolicy::parse("auto").unwrap(), SelectionPolicy::Auto);
    assert_eq!(SelectionPolicy::parse("low-latency").unwrap(), SelectionPolicy::Auto);
    assert!(matches!(SelectionPolicy::parse("low-prio"), Err(llmfabric_core::ResolverError::UnknownPolicy(_))));
}

#[test]
fn zero_or_negative_context_length_fails_fast() {
    let resolver = Resolver::new();
    let providers = vec![provider("p1", "m", BackendType::Ollama, CapabilityFlags::ALL, 4096, &["http://h1"])];
    let req = ResolveRequest { context_length: 0, ..Default::default() };
    let err = resolver.chat(&req, &providers, "auto").unwrap_err();
    assert!(matches!(err, llmfabric_core::ResolverError::InvalidRequest(_)));

    let req_neg = ResolveRequest { context_length: -5, ..Default::default() };
    let err = resolver.chat(&req_neg, &providers, "auto").unwrap_err();
    assert!(matches!(err, llmfabric_core::ResolverError::InvalidRequest(_)));
}

#[test]
fn unknown_policy_name_is_rejected() {
    let resolver = Resolver::new();
    let providers = vec![provider("p1", "m", BackendType::Ollama, CapabilityFlags::ALL, 4096, &["http://h1"])];
    let req = ResolveRequest { context_length: 1024, ..Default::default() };
    let err = resolver.chat(&req, &providers, "low-prio").unwrap_err();
    assert!(matches!(err, llmfabric_core::ResolverError::UnknownPolicy(name) if name == "low-prio"));
}

#[test]
fn no_providers_of_the_requested_type_yields_no_available_models() {
    let resolver = Resolver::new();
    let providers = vec![provider("p1", "m", BackendType::Openai, CapabilityFlags::ALL, 4096, &["http://h1"])];
    let req = ResolveRequest { provider_types: vec![BackendType::Ollama], context_length: 1024, ..Default::default() };
    let err = resolver.chat(&req, &providers, "auto").unwrap_err();
    assert!(matches!(err, llmfabric_core::ResolverError::NoAvailableModels(_)));
}

#[test]
fn missing_capability_and_insufficient_context_are_reported_as_rejected_candidates() {
    let resolver = Resolver::new();
    let embed_only = CapabilityFlags { can_chat: false, can_embed: true, can_prompt: false, can_stream: false };
    let providers = vec![
        provider("p1", "m1", BackendType::Ollama, embed_only, 8192, &["http://h1"]),
        provider("p2", "m2", BackendType::Ollama, CapabilityFlags::ALL, 512, &["http://h2"]),
    ];
    let req = ResolveRequest { context_length: 4096, ..Default::default() };
    let err = resolver.chat(&req, &providers, "auto").unwrap_err();
    match err {
        llmfabric_core::ResolverError::NoSatisfactoryModel { rejected, .. } => {
            assert_eq!(rejected.len(), 2);
            assert!(rejected.iter().any(|r| r.provider_id == "p1" && r.reason.contains("capability")));
            assert!(rejected.iter().any(|r| r.provider_id == "p2" && r.reason.contains("context length")));
        }
        other => panic!("expected NoSatisfactoryModel, got {other:?}"),
    }
}

#[test]
fn auto_policy_picks_highest_context_length_among_candidates() {
    let resolver = Resolver::new();
    let providers = vec![
        provider("p1", "m", BackendType::Ollama, CapabilityFlags::ALL, 4096, &["http://h1"]),
        provider("p2", "m", BackendType::Ollama, CapabilityFlags::ALL, 32768, &["http://h2"]),
        provider("p3", "m", BackendType::Ollama, CapabilityFlags::ALL, 8192, &["http://h3"]),
    ];
    let req = ResolveRequest { context_length: 1024, ..Default::default() };
    let (_, model_name) = resolver.chat(&req, &providers, "auto").unwrap();
    assert_eq!(model_name, "m");
}

#[test]
fn model_name_preference_list_is_honored_in_priority_order() {
    let resolver = Resolver::new();
    let providers = vec![
        provider("p1", "llama3", BackendType::Ollama, CapabilityFlags::ALL, 4096, &["http://h1"]),
        provider("p2", "mistral", BackendType::Ollama, CapabilityFlags::ALL, 4096, &["http://h2"]),
    ];
    let req = ResolveRequest {
        model_names: vec!["mistral".to_string(), "llama3".to_string()],
        context_length: 1024,
        ..Default::default()
    };
    let (_, model_name) = resolver.chat(&req, &providers, "auto").unwrap();
    assert_eq!(model_name, "mistral");
}

#[test]
fn normalized_model_name_matching_ignores_tag_and_case() {
    let resolver = Resolver::new();
    let providers = vec![provider("p1", "Llama3:latest", BackendType::Ollama, CapabilityFlags::ALL, 4096, &["http://h1"])];
    let req = ResolveRequest { model_names: vec!["llama3".to_string()], context_length: 1024, ..Default::default() };
    let (_, model_name) = resolver.chat(&req, &providers, "auto").unwrap();
    assert_eq!(model_name, "Llama3:latest");
}

#[test]
fn embed_capability_is_required_for_the_embed_entry_point() {
    let resolver = Resolver::new();
    let chat_only = CapabilityFlags { can_chat: true, can_embed: false, can_prompt: true, can_stream: true };
    let providers = vec![provider("p1", "m", BackendType::Ollama, chat_only, 4096, &["http://h1"])];
    let req = ResolveRequest { context_length: 1024, ..Default::default() };
    let err = resolver.embed(&req, &providers, "auto").unwrap_err();
    assert!(matches!(err, llmfabric_core::ResolverError::NoSatisfactoryModel { .. }));
}
