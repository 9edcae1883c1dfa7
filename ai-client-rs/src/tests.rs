//! Mock-server tests for the chat completion client.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{AiClient, AiError};

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-4-turbo-preview",
        "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 },
        "choices": [
            { "index": 0, "finish_reason": "stop",
              "message": { "role": "assistant", "content": content } }
        ]
    })
}

fn test_client(server: &MockServer) -> AiClient {
    AiClient::builder()
        .api_key("test-key")
        .base_url(server.uri())
        .model("gpt-4-turbo-preview")
        .timeout(5)
        .max_retries(2)
        .retry_delays(1, 5)
        .build()
        .unwrap()
}

#[tokio::test]
async fn analyze_sends_fixed_sampling_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4-turbo-preview",
            "temperature": 0.3,
            "max_tokens": 4000
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("{\"ok\":true}")))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let out = client.analyze("system", "user").await.unwrap();
    assert_eq!(out, "{\"ok\":true}");
}

#[tokio::test]
async fn server_errors_are_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("recovered")))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let out = client.analyze("system", "user").await.unwrap();
    assert_eq!(out, "recovered");
}

#[tokio::test]
async fn auth_errors_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.analyze("system", "user").await.unwrap_err();
    assert!(matches!(err, AiError::InvalidRequest(_)));
}

#[tokio::test]
async fn empty_choices_is_a_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [], "usage": null
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.analyze("system", "user").await.unwrap_err();
    assert!(matches!(err, AiError::Parse(_)));
}

#[test]
fn builder_defaults_to_the_analysis_model() {
    let client = AiClient::builder().api_key("k").build().unwrap();
    assert_eq!(client.model(), "gpt-4-turbo-preview");
}

#[tokio::test]
async fn missing_api_key_fails_without_network() {
    let client = AiClient::builder()
        .base_url("http://127.0.0.1:9")
        .build()
        .unwrap();
    assert!(!client.is_configured());
    let err = client.analyze("system", "user").await.unwrap_err();
    assert!(matches!(err, AiError::InvalidRequest(_)));
}
