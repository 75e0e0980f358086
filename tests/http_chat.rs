//! HTTP client tests against a mock server.
//!
//! These exercise the real request/response path: JSON body shape, role
//! mapping, status handling, and the malformed-body failure modes the
//! session recovers from.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use authenex_assist::chat::{ChatTransport, HttpChatClient};
use authenex_assist::config::{ChatConfig, ScanConfig};
use authenex_assist::scan::ScanClient;
use authenex_assist::session::SessionMode;
use authenex_assist::transcript::Turn;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn chat_config(server: &MockServer) -> ChatConfig {
    ChatConfig {
        base_url: server.uri(),
        ..Default::default()
    }
}

#[tokio::test]
async fn chat_request_carries_message_history_and_mode() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "message": "what is a deepfake?",
            "mode": "text",
            "history": [
                { "role": "user", "parts": [{ "text": "hi" }] },
                { "role": "model", "parts": [{ "text": "hello!" }] },
            ],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "A deepfake is synthetic media.",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpChatClient::new(&chat_config(&server)).unwrap();
    let history = vec![Turn::user("hi"), Turn::assistant("hello!")];
    let reply = client
        .send("what is a deepfake?", &history, SessionMode::Text)
        .await
        .unwrap();

    assert_eq!(reply, "A deepfake is synthetic media.");
}

#[tokio::test]
async fn chat_voice_mode_is_tagged_on_the_wire() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({ "mode": "voice" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "hi" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpChatClient::new(&chat_config(&server)).unwrap();
    client.send("hello", &[], SessionMode::Voice).await.unwrap();
}

#[tokio::test]
async fn chat_non_success_status_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = HttpChatClient::new(&chat_config(&server)).unwrap();
    let err = client
        .send("hello", &[], SessionMode::Text)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("500"), "got: {err}");
}

#[tokio::test]
async fn chat_missing_response_field_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    let client = HttpChatClient::new(&chat_config(&server)).unwrap();
    let err = client
        .send("hello", &[], SessionMode::Text)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("response"), "got: {err}");
}

#[tokio::test]
async fn chat_unreachable_endpoint_is_an_error() {
    // Nothing listens here.
    let config = ChatConfig {
        base_url: "http://127.0.0.1:9".to_owned(),
        request_timeout_ms: 1_000,
        ..Default::default()
    };
    let client = HttpChatClient::new(&config).unwrap();
    assert!(client.send("hello", &[], SessionMode::Text).await.is_err());
}

fn scan_config(server: &MockServer) -> ScanConfig {
    ScanConfig {
        base_url: server.uri(),
        ..Default::default()
    }
}

#[tokio::test]
async fn scan_returns_structured_verdict() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/scan"))
        .and(body_partial_json(json!({
            "image": "data:image/jpeg;base64,AAAA",
            "uid": "user-42",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "verdict": "Likely AI-Generated",
            "confidence": 87,
            "reasoning": "Texture inconsistencies around the hairline.",
            "detailedAnalysis": { "visualQuality": "high" },
            "parameters": { "textureConsistency": 41 },
            "flags": ["hairline blur", "asymmetric reflections"],
        })))
        .mount(&server)
        .await;

    let client = ScanClient::new(&scan_config(&server)).unwrap();
    let verdict = client
        .analyze_image("data:image/jpeg;base64,AAAA", "user-42")
        .await
        .unwrap();

    assert_eq!(verdict.verdict, "Likely AI-Generated");
    assert!((verdict.confidence - 87.0).abs() < f64::EPSILON);
    assert!((verdict.deepfake_probability() - 87.0).abs() < f64::EPSILON);
    assert!((verdict.trust_score() - 13.0).abs() < f64::EPSILON);
    assert_eq!(verdict.flags.unwrap().len(), 2);
}

#[tokio::test]
async fn scan_propagates_backend_validation_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/scan"))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({
            "error": "AI analysis returned invalid data",
            "raw": "not json at all",
        })))
        .mount(&server)
        .await;

    let client = ScanClient::new(&scan_config(&server)).unwrap();
    let err = client
        .analyze_image("data:image/jpeg;base64,AAAA", "user-42")
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("502"), "got: {message}");
    assert!(
        message.contains("AI analysis returned invalid data"),
        "got: {message}"
    );
}

#[tokio::test]
async fn scan_rejects_verdict_missing_required_fields() {
    let server = MockServer::start().await;

    // Confidence missing entirely.
    Mock::given(method("POST"))
        .and(path("/api/scan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "verdict": "Uncertain",
        })))
        .mount(&server)
        .await;

    let client = ScanClient::new(&scan_config(&server)).unwrap();
    assert!(client.analyze_image("data:...", "user-1").await.is_err());
}
