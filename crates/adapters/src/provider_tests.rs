// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::client::new_http_client;

fn handle(base_url: String, backend_type: BackendType, api_key: Option<&str>) -> ProviderHandle {
    ProviderHandle {
        model_name: "llama3:8b".to_string(),
        backend_type,
        base_url,
        api_key: api_key.map(str::to_string),
    }
}

#[tokio::test]
async fn chat_extracts_assistant_message_from_choices() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "hello there"}}]
        })))
        .mount(&server)
        .await;

    let client = HttpProviderClient::new(
        new_http_client(std::time::Duration::from_secs(1)),
        handle(server.uri(), BackendType::Ollama, None),
    );

    let reply = client.chat(&[ChatMessage { role: "user".to_string(), content: "hi".to_string() }]).await.unwrap();
    assert_eq!(reply.content, "hello there");
}

#[tokio::test]
async fn chat_surfaces_rejection_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = HttpProviderClient::new(
        new_http_client(std::time::Duration::from_secs(1)),
        handle(server.uri(), BackendType::Ollama, None),
    );

    let err = client.chat(&[]).await.unwrap_err();
    assert!(matches!(err, ClientError::Rejected(_)));
}

#[tokio::test]
async fn embed_extracts_vector_from_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{"embedding": [0.1, 0.2, 0.3]}]
        })))
        .mount(&server)
        .await;

    let client = HttpProviderClient::new(
        new_http_client(std::time::Duration::from_secs(1)),
        handle(server.uri(), BackendType::Openai, Some("sk-test")),
    );

    let vec = client.embed("text").await.unwrap();
    assert_eq!(vec, vec![0.1f32, 0.2, 0.3]);
}

#[tokio::test]
async fn stream_invokes_on_chunk_per_sse_line_and_stops_at_done() {
    let server = MockServer::start().await;
    let body = concat!(
        "data: {\"choices\":[{\"text\":\"hel\"}]}\n",
        "data: {\"choices\":[{\"text\":\"lo\"}]}\n",
        "data: [DONE]\n",
    );
    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let client = HttpProviderClient::new(
        new_http_client(std::time::Duration::from_secs(1)),
        handle(server.uri(), BackendType::Ollama, None),
    );

    let mut chunks = Vec::new();
    client.stream("prompt", &mut |c| chunks.push(c.to_string())).await.unwrap();
    assert_eq!(chunks, vec!["hel".to_string(), "lo".to_string()]);
}
