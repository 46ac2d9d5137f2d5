// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::client::new_http_client;

#[tokio::test]
async fn list_models_parses_tag_names() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "models": [{"name": "llama3:8b"}, {"name": "mistral:7b"}]
        })))
        .mount(&server)
        .await;

    let client = new_http_client(std::time::Duration::from_secs(1));
    let names = list_models(&client, &server.uri()).await.unwrap();
    assert_eq!(names, vec!["llama3:8b".to_string(), "mistral:7b".to_string()]);
}

#[tokio::test]
async fn list_models_rejects_non_2xx() {
    let server = MockServer::start().await;
    Mock::given(method("GET")).and(path("/api/tags")).respond_with(ResponseTemplate::new(500)).mount(&server).await;

    let client = new_http_client(std::time::Duration::from_secs(1));
    let err = list_models(&client, &server.uri()).await.unwrap_err();
    assert!(matches!(err, ProbeError::RemoteRejected(_)));
}

#[tokio::test]
async fn invalid_base_url_is_rejected_before_any_request() {
    let client = new_http_client(std::time::Duration::from_secs(1));
    let err = list_models(&client, "not a url").await.unwrap_err();
    assert!(matches!(err, ProbeError::InvalidBaseUrl(_)));
}

#[tokio::test]
async fn delete_model_sends_name_in_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/delete"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = new_http_client(std::time::Duration::from_secs(1));
    delete_model(&client, &server.uri(), "llama3:8b").await.unwrap();
}

#[tokio::test]
async fn pull_model_streams_ndjson_progress_lines() {
    let server = MockServer::start().await;
    let body = concat!(
        "{\"status\":\"pulling manifest\"}\n",
        "{\"status\":\"downloading\",\"digest\":\"sha256:abc\",\"total\":100,\"completed\":50}\n",
        "{\"status\":\"success\"}\n",
    );
    Mock::given(method("POST"))
        .and(path("/api/pull"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/x-ndjson"))
        .mount(&server)
        .await;

    let client = new_http_client(std::time::Duration::from_secs(1));
    let mut statuses = Vec::new();
    pull_model(&client, &server.uri(), "llama3:8b", |line| statuses.push(line.status)).await.unwrap();

    assert_eq!(statuses, vec!["pulling manifest", "downloading", "success"]);
}
