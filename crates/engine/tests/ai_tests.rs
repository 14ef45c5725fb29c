// Codepad - Terminal Code Editor
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! AI gateway against mocked Ollama and Gemini endpoints

use codepad_common::{Language, ValidationMarker};
use codepad_engine::{
    extract_code_block, AiClient, AiConfig, AiError, AiProvider, GEMINI_KEY_HEADER,
};
use serde_json::json;
use serial_test::serial;
use tracing::info;
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn ollama_client(server: &MockServer) -> AiClient {
    let config = AiConfig {
        endpoint: Some(server.uri()),
        model: Some("test-model".to_string()),
        ..AiConfig::for_provider(AiProvider::Ollama)
    };
    AiClient::new(config).unwrap()
}

fn gemini_config(server: &MockServer) -> AiConfig {
    AiConfig {
        endpoint: Some(format!("{}/", server.uri())),
        api_key: Some("secret".to_string()),
        ..AiConfig::for_provider(AiProvider::Gemini)
    }
}

#[tokio::test]
async fn test_ollama_generate() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({ "model": "test-model", "stream": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "test-model",
            "response": "```python\nprint('hi')\n```",
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ollama_client(&server);
    let reply = client.request_generate("say hi", Language::Python).await.unwrap();
    assert_eq!(extract_code_block(&reply), "print('hi')\n");
}

#[tokio::test]
async fn test_ollama_fix_embeds_marker_in_prompt() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "let a = (1);" })))
        .mount(&server)
        .await;

    let client = ollama_client(&server);
    let marker = ValidationMarker::new(1, 9, "Unclosed '('");
    let reply = client.request_fix(&marker, "let a = (1;", Language::JavaScript).await.unwrap();
    assert_eq!(reply, "let a = (1);");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = body["prompt"].as_str().unwrap();
    assert!(prompt.contains("Unclosed '('"));
    assert!(prompt.contains("let a = (1;"));
    assert!(prompt.contains("javascript"));
}

#[tokio::test]
async fn test_gemini_generate_content() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .and(header(GEMINI_KEY_HEADER, "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "A closure." }], "role": "model" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = AiClient::new(gemini_config(&server)).unwrap();
    let reply = client.explain("|x| x + 1", Language::Rust).await.unwrap();
    assert_eq!(reply, "A closure.");
}

#[tokio::test]
async fn test_gemini_without_candidates_is_decode_error() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let client = AiClient::new(gemini_config(&server)).unwrap();
    let err = client.chat("hello").await.unwrap_err();
    assert!(matches!(err, AiError::Decode(_)), "{err}");
}

#[tokio::test]
async fn test_http_error_surfaces_status() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&server)
        .await;

    let client = ollama_client(&server);
    match client.chat("hello").await {
        Err(AiError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "model not loaded");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = ollama_client(&server);
    let err = client.chat("hello").await.unwrap_err();
    assert!(matches!(err, AiError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_error() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let config = AiConfig {
        endpoint: Some("http://127.0.0.1:9".to_string()),
        ..AiConfig::for_provider(AiProvider::Ollama)
    };
    let client = AiClient::new(config).unwrap();
    let err = client.chat("hello").await.unwrap_err();
    assert!(matches!(err, AiError::Transport(_)));
}

#[tokio::test]
async fn test_transport_error_does_not_reveal_api_key() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let config = AiConfig {
        endpoint: Some("http://127.0.0.1:9".to_string()),
        api_key: Some("SECRETKEY123".to_string()),
        ..AiConfig::for_provider(AiProvider::Gemini)
    };
    let client = AiClient::new(config).unwrap();
    let err = client.chat("hello").await.unwrap_err();

    assert!(matches!(err, AiError::Transport(_)));
    assert!(!err.to_string().contains("SECRETKEY123"));
    assert!(!format!("{err:?}").contains("SECRETKEY123"));
}

#[tokio::test]
async fn test_gemini_missing_key_never_sends() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let server = MockServer::start().await;
    let config = AiConfig {
        endpoint: Some(server.uri()),
        api_key_env: "CODEPAD_TEST_UNSET_KEY".to_string(),
        ..AiConfig::for_provider(AiProvider::Gemini)
    };
    let client = AiClient::new(config).unwrap();

    match client.chat("hello").await {
        Err(AiError::MissingApiKey { provider, env_var }) => {
            assert_eq!(provider, AiProvider::Gemini);
            assert_eq!(env_var, "CODEPAD_TEST_UNSET_KEY");
        }
        other => panic!("expected missing key error, got {other:?}"),
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn test_gemini_key_from_environment() {
    codepad_common::logging::ensure_test_logging(None);
    info!("Running test");

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header(GEMINI_KEY_HEADER, "from-env"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "ok" }] } }]
        })))
        .mount(&server)
        .await;

    std::env::set_var("CODEPAD_TEST_GEMINI_KEY", "from-env");
    let config = AiConfig {
        endpoint: Some(server.uri()),
        api_key_env: "CODEPAD_TEST_GEMINI_KEY".to_string(),
        ..AiConfig::for_provider(AiProvider::Gemini)
    };
    let client = AiClient::new(config).unwrap();
    let reply = client.chat("hello").await;
    std::env::remove_var("CODEPAD_TEST_GEMINI_KEY");

    assert_eq!(reply.unwrap(), "ok");
}
