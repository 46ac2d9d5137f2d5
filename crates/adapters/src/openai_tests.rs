// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::client::new_http_client;

#[tokio::test]
async fn list_models_sends_bearer_token_and_parses_ids() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .and(header("Authorization", "Bearer sk-test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{"id": "gpt-4o"}, {"id": "gpt-4o-mini"}]
        })))
        .mount(&server)
        .await;

    let client = new_http_client(std::time::Duration::from_secs(1));
    let names = list_models(&client, &server.uri(), "sk-test-key").await.unwrap();
    assert_eq!(names, vec!["gpt-4o".to_string(), "gpt-4o-mini".to_string()]);
}

#[tokio::test]
async fn list_models_surfaces_rejection_on_bad_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET")).and(path("/v1/models")).respond_with(ResponseTemplate::new(401)).mount(&server).await;

    let client = new_http_client(std::time::Duration::from_secs(1));
    let err = list_models(&client, &server.uri(), "sk-bad").await.unwrap_err();
    assert!(matches!(err, ProbeError::RemoteRejected(_)));
}
