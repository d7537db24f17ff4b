use docgen_core::{DocgenError, TextGenerator};
use docgen_model::{GeminiConfig, GeminiGenerator};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

fn generator(server: &MockServer) -> GeminiGenerator {
    GeminiGenerator::new(GeminiConfig::new("test-key").with_base_url(server.uri())).unwrap()
}

#[tokio::test]
async fn returns_candidate_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({"contents": [{"role": "user", "parts": [{"text": "Write it"}]}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "# Report\n\nDone."}]},
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = generator(&server).generate("Write it").await.unwrap();
    assert_eq!(text, "# Report\n\nDone.");
}

#[tokio::test]
async fn server_error_is_generation_error_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal failure"))
        .expect(1)
        .mount(&server)
        .await;

    let err = generator(&server).generate("prompt").await.unwrap_err();
    assert!(matches!(err, DocgenError::Generation { timed_out: false, .. }));
    assert!(err.to_string().contains("500"));
    assert!(err.to_string().contains("internal failure"));
}

#[tokio::test]
async fn missing_candidates_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        })))
        .mount(&server)
        .await;

    let err = generator(&server).generate("prompt").await.unwrap_err();
    assert!(err.to_string().contains("Malformed"));
    assert!(err.to_string().contains("SAFETY"));
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = generator(&server).generate("prompt").await.unwrap_err();
    assert!(matches!(err, DocgenError::Generation { .. }));
}

#[tokio::test]
async fn slow_service_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let config = GeminiConfig::new("test-key")
        .with_base_url(server.uri())
        .with_timeout(Duration::from_millis(100));
    let err = GeminiGenerator::new(config).unwrap().generate("prompt").await.unwrap_err();
    assert!(err.is_timeout());
}

#[tokio::test]
async fn custom_model_is_used_in_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "ok"}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config =
        GeminiConfig::new("test-key").with_base_url(server.uri()).with_model("models/gemini-2.5-pro");
    let generator = GeminiGenerator::new(config).unwrap();
    assert_eq!(generator.model_id(), "models/gemini-2.5-pro");
    assert_eq!(generator.generate("prompt").await.unwrap(), "ok");
}
