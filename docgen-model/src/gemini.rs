//! Gemini REST client.

use crate::config::GeminiConfig;
use async_trait::async_trait;
use docgen_core::{DocgenError, Result, TextGenerator};
use docgen_telemetry::{Instrument, debug, model_call_span};
use reqwest::{
    Client, Response,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use serde::{Deserialize, Serialize};

const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if it has any.
    fn into_text(self) -> Option<String> {
        let candidate = self.candidates.into_iter().next()?;
        let text: String = candidate
            .content?
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

fn truncate(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(DocgenError::generation(format!(
        "Generation service returned {status}: {}",
        truncate(&body)
    )))
}

fn send_error(err: reqwest::Error) -> DocgenError {
    if err.is_timeout() {
        DocgenError::generation_timeout("Generation service timed out")
    } else {
        DocgenError::generation(format!("Generation service unreachable: {err}"))
    }
}

/// Text generation over the Gemini `generateContent` REST endpoint.
///
/// One POST per call, no retries.
///
/// # Example
///
/// ```rust,ignore
/// use docgen_model::{GeminiConfig, GeminiGenerator};
///
/// let generator = GeminiGenerator::new(GeminiConfig::new(std::env::var("GEMINI_API_KEY")?))?;
/// let markdown = generator.generate("Write a sprint report").await?;
/// ```
#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    client: Client,
    config: GeminiConfig,
}

impl GeminiGenerator {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let mut api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| DocgenError::Config("Gemini API key is not a valid header value".into()))?;
        api_key.set_sensitive(true);
        let headers =
            HeaderMap::from_iter([(HeaderName::from_static("x-goog-api-key"), api_key)]);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| DocgenError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn api_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.effective_base_url().trim_end_matches('/'),
            self.config.model_name()
        )
    }

    fn build_request<'a>(&self, prompt: &'a str) -> GenerateContentRequest<'a> {
        let generation_config = match (self.config.temperature, self.config.max_output_tokens) {
            (None, None) => None,
            (temperature, max_output_tokens) => {
                Some(GenerationConfig { temperature, max_output_tokens })
            }
        };
        GenerateContentRequest {
            contents: [RequestContent { role: "user", parts: [RequestPart { text: prompt }] }],
            generation_config,
        }
    }

    async fn call(&self, prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(self.api_url())
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(send_error)?;
        let response = check_response(response).await?;

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                DocgenError::generation_timeout("Generation service timed out")
            } else {
                DocgenError::generation(format!("Malformed generation response: {e}"))
            }
        })?;

        let finish_reason =
            body.candidates.first().and_then(|c| c.finish_reason.clone()).unwrap_or_default();
        body.into_text().ok_or_else(|| {
            DocgenError::generation(format!(
                "Malformed generation response: no candidate text (finish reason: {})",
                if finish_reason.is_empty() { "none" } else { finish_reason.as_str() }
            ))
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    fn model_id(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let text = self.call(prompt).instrument(model_call_span(self.config.model_name())).await?;
        debug!(model = %self.config.model, chars = text.len(), "generation completed");
        Ok(text)
    }
}
