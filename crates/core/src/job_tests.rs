// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn model_pull_job_id_is_the_backend_url() {
    let job = Job::model_pull("http://localhost:11434", "llama3", 1_000);
    assert_eq!(job.id.as_str(), "http://localhost:11434");
    assert_eq!(job.task_type.as_str(), "model_pull");
}

#[test]
fn model_pull_payload_round_trips() {
    let job = Job::model_pull("http://host:1", "llama3", 1_000);
    let payload = job.model_pull_payload().expect("payload decodes");
    assert_eq!(payload.url, "http://host:1");
    assert_eq!(payload.model, "llama3");
}

#[test]
fn other_task_type_payload_is_not_a_model_pull_payload() {
    let job = Job {
        id: JobId::new("custom-1"),
        task_type: TaskType::Other("cleanup".into()),
        payload: b"not json for our struct".to_vec(),
        scheduled_for_epoch_ms: 0,
        valid_until_epoch_ms: None,
        retry_count: 0,
        created_at_epoch_ms: 0,
    };
    assert!(job.model_pull_payload().is_none());
}

#[test]
fn leased_job_expiry() {
    let job = Job::model_pull("http://host:1", "m", 0);
    let leased = LeasedJob { job, leaser: "worker-1".into(), lease_expiration_epoch_ms: 1_000 };
    assert!(!leased.is_expired(999));
    assert!(leased.is_expired(1_000));
    assert!(leased.is_expired(1_001));
}
