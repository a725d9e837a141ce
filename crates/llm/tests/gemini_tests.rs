//! HTTP-level tests for the Gemini provider against a mock server.

use llm::{AIMessage, AIProvider, GeminiProvider, GenerateOptions, LlmError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "gemini-2.5-flash";

fn provider_for(server: &MockServer) -> GeminiProvider {
    GeminiProvider::new("test-key")
        .unwrap()
        .with_base_url(server.uri())
}

#[tokio::test]
async fn test_generate_text_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/models/{MODEL}:generateContent")))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "systemInstruction": { "parts": [{ "text": "You are an expert Brand Strategist." }] },
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "```json\n" }, { "text": "{\"ok\":true}\n```" }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 5, "totalTokenCount": 17 },
            "modelVersion": "gemini-2.5-flash-001"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let messages = vec![
        AIMessage::system("You are an expert Brand Strategist."),
        AIMessage::user("Analyze Acme"),
    ];
    let options = GenerateOptions {
        json_mode: true,
        ..Default::default()
    };

    let response = provider.generate_text(MODEL, &messages, &options).await.unwrap();

    assert_eq!(response.text, "```json\n{\"ok\":true}\n```");
    assert_eq!(response.usage.input_tokens, 12);
    assert_eq!(response.usage.output_tokens, 5);
    assert_eq!(response.usage.total_tokens, 17);
    assert_eq!(response.model, "gemini-2.5-flash-001");
    assert_eq!(response.provider, "gemini");

    let value: serde_json::Value = llm::parse_json_text(&response.text).unwrap();
    assert_eq!(value, json!({"ok": true}));
}

#[tokio::test]
async fn test_empty_candidates_return_empty_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/models/{MODEL}:generateContent")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let response = provider
        .generate_text(MODEL, &[AIMessage::user("hi")], &GenerateOptions::default())
        .await
        .unwrap();

    assert!(response.text.is_empty());
    assert_eq!(response.model, MODEL);
}

#[tokio::test]
async fn test_api_error_is_reported_with_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED" }
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let err = provider
        .generate_text(MODEL, &[AIMessage::user("hi")], &GenerateOptions::default())
        .await
        .unwrap_err();

    match &err {
        LlmError::Api { status, message } => {
            assert_eq!(*status, 429);
            assert_eq!(message, "RESOURCE_EXHAUSTED - Quota exceeded");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_error_body_is_kept() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let err = provider
        .generate_text(MODEL, &[AIMessage::user("hi")], &GenerateOptions::default())
        .await
        .unwrap_err();

    assert!(
        matches!(err, LlmError::Api { status: 503, ref message } if message == "upstream unavailable")
    );
}
