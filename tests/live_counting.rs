//! Live counting tests against a local mock of the Count Tokens API.
//!
//! The mock runs on its own tokio runtime in a background thread, since the
//! client under test blocks on its own private runtime.

use std::net::SocketAddr;
use std::sync::mpsc;

use axum::{
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use token_bench::config::AnthropicConfig;
use token_bench::models::{Encoding, Provider};
use token_bench::tokenizer::{
    count_tokens_with_encoding, AnthropicClient, CountTokensApi, CounterMode, CounterRegistry,
};
use token_bench::BenchError;

const GOOD_KEY: &str = "sk-ant-good";

/// Reports one token per whitespace-separated word, or misbehaves on request
async fn count_tokens(headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
    if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some(GOOD_KEY) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"type": "error", "error": {"type": "authentication_error"}})),
        );
    }
    if headers.get("anthropic-version").is_none() {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "missing version"})));
    }

    let model = body["model"].as_str().unwrap_or_default();
    if model == "claude-malformed" {
        return (StatusCode::OK, Json(json!({"tokens": "many"})));
    }

    let content = body["messages"][0]["content"].as_str().unwrap_or_default();
    let role = body["messages"][0]["role"].as_str().unwrap_or_default();
    assert_eq!(role, "user");
    (
        StatusCode::OK,
        Json(json!({"input_tokens": content.split_whitespace().count()})),
    )
}

/// Start the mock server and return its address
fn spawn_mock_api() -> SocketAddr {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            let app = Router::new().route("/v1/messages/count_tokens", post(count_tokens));
            axum::serve(listener, app).await.unwrap();
        });
    });
    rx.recv().unwrap()
}

fn config_for(addr: SocketAddr, key: &str) -> AnthropicConfig {
    AnthropicConfig {
        api_key: Some(key.to_string()),
        base_url: format!("http://{addr}"),
        timeout_secs: Some(10),
        ..Default::default()
    }
}

#[test]
fn test_client_returns_live_count() {
    let addr = spawn_mock_api();
    let client = AnthropicClient::new(&config_for(addr, GOOD_KEY), GOOD_KEY).unwrap();

    let tokens = client
        .count_tokens("claude-3-5-haiku-20241022", "lorem ipsum dolor sit amet")
        .unwrap();
    assert_eq!(tokens, 5);
}

#[test]
fn test_client_reports_auth_failure() {
    let addr = spawn_mock_api();
    let client = AnthropicClient::new(&config_for(addr, "sk-ant-bad"), "sk-ant-bad").unwrap();

    let err = client.count_tokens("claude", "lorem").unwrap_err();
    match err {
        BenchError::Upstream { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("authentication_error"));
        },
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[test]
fn test_client_reports_malformed_body() {
    let addr = spawn_mock_api();
    let client = AnthropicClient::new(&config_for(addr, GOOD_KEY), GOOD_KEY).unwrap();

    let err = client.count_tokens("claude-malformed", "lorem").unwrap_err();
    assert!(matches!(err, BenchError::MalformedResponse(_)));
}

#[test]
fn test_registry_live_counts_and_fallbacks() {
    let addr = spawn_mock_api();
    let registry = CounterRegistry::new(&config_for(addr, GOOD_KEY));
    let counter = registry.counter(Provider::Anthropic);
    assert_eq!(counter.mode(), CounterMode::Live);

    let text = "ut enim ad minim veniam";
    assert_eq!(counter.count("claude-sonnet-4-20250514", text), 5);

    // Malformed response degrades this call only
    assert_eq!(
        counter.count("claude-malformed", text),
        count_tokens_with_encoding(text, Encoding::Cl100kBase)
    );
    assert_eq!(counter.count("claude-3-5-haiku-20241022", text), 5);

    let stats = counter.live_stats().unwrap();
    assert_eq!(stats.live_calls(), 2);
    assert_eq!(stats.fallbacks(), 1);
}

#[test]
fn test_registry_bad_key_degrades_every_call() {
    let addr = spawn_mock_api();
    let registry = CounterRegistry::new(&config_for(addr, "sk-ant-bad"));

    let text = "quis nostrud exercitation ullamco laboris";
    for model in ["claude-3-5-sonnet-20240620", "claude-3-5-haiku-20241022"] {
        assert_eq!(
            registry.count(Provider::Anthropic, model, text),
            count_tokens_with_encoding(text, Encoding::Cl100kBase)
        );
    }
    let stats = registry.counter(Provider::Anthropic).live_stats().unwrap();
    assert_eq!(stats.fallbacks(), 2);
}
