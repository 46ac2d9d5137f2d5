// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::str::FromStr;

#[test]
fn backend_type_round_trips_through_display_and_from_str() {
    for t in [BackendType::Ollama, BackendType::Vllm, BackendType::Openai, BackendType::Gemini] {
        let s = t.to_string();
        assert_eq!(BackendType::from_str(&s).unwrap(), t);
    }
}

#[test]
fn self_hosted_classification() {
    assert!(BackendType::Ollama.is_self_hosted());
    assert!(BackendType::Vllm.is_self_hosted());
    assert!(!BackendType::Openai.is_self_hosted());
    assert!(!BackendType::Gemini.is_self_hosted());
}

#[test]
fn unknown_backend_type_is_rejected() {
    assert!(BackendType::from_str("bedrock").is_err());
}

#[test]
fn new_backend_gets_unique_id_and_timestamps() {
    let b = Backend::new("local-ollama", "http://localhost:11434", BackendType::Ollama, 1_000);
    assert_eq!(b.created_at_epoch_ms, 1_000);
    assert_eq!(b.updated_at_epoch_ms, 1_000);
    assert!(!b.id.is_empty());
}
