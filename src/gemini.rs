//! Gemini `generateContent` client for image models.
//!
//! Structure:
//! - Wire types: request and response bodies
//! - Pure functions: request building, image extraction, error classification
//! - Effect: one blocking HTTPS call

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::generator::{GenerationError, ImageGenerator};
use crate::types::GeneratorConfig;

/// Service message that means the key (or its project) is unknown.
pub const AUTH_ERROR_MARKER: &str = "Requested entity was not found";

/// MIME type assumed when the service does not report one.
const DEFAULT_IMAGE_MIME: &str = "image/png";

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<RequestContent>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct RequestContent {
    pub role: &'static str,
    pub parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
pub struct TextPart {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<&'static str>,
    pub image_config: ImageConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    pub aspect_ratio: String,
    pub image_size: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<ResponseContent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, alias = "inline_data")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default, alias = "mime_type")]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub data: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

// ============================================================================
// PURE FUNCTIONS
// ============================================================================

/// Build the request body for one portrait image.
pub fn build_request(prompt: &str, config: &GeneratorConfig) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![RequestContent {
            role: "user",
            parts: vec![TextPart {
                text: prompt.to_string(),
            }],
        }],
        generation_config: GenerationConfig {
            response_modalities: vec!["TEXT", "IMAGE"],
            image_config: ImageConfig {
                aspect_ratio: config.aspect_ratio.clone(),
                image_size: config.image_size.clone(),
            },
        },
    }
}

/// Full URL for a model's `generateContent` method.
pub fn endpoint_for_model(endpoint: &str, model: &str) -> String {
    let model = model.trim();
    let model_path = if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    };
    format!("{}/{}:generateContent", endpoint.trim_end_matches('/'), model_path)
}

/// First inline image of the first candidate, as a data URI.
///
/// Parts without data (text, empty blobs) are skipped.
pub fn extract_inline_image(response: &GenerateContentResponse) -> Option<String> {
    let parts = &response.candidates.first()?.content.as_ref()?.parts;
    parts
        .iter()
        .filter_map(|part| part.inline_data.as_ref())
        .find(|inline| !inline.data.is_empty())
        .map(|inline| {
            let mime = inline
                .mime_type
                .as_deref()
                .filter(|m| !m.is_empty())
                .unwrap_or(DEFAULT_IMAGE_MIME);
            format!("data:{};base64,{}", mime, inline.data)
        })
}

/// Classify a non-success response.
pub fn classify_failure(status: StatusCode, body: &str) -> GenerationError {
    let message = serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    if message.contains(AUTH_ERROR_MARKER) {
        GenerationError::AuthenticationRequired
    } else if message.is_empty() {
        GenerationError::GenerationFailed(format!("HTTP {}", status))
    } else {
        GenerationError::GenerationFailed(format!("HTTP {}: {}", status, message))
    }
}

/// Turn a successful response body into an image reference.
pub fn parse_success(body: &str) -> Result<String, GenerationError> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::GenerationFailed(format!("invalid response: {}", e)))?;
    extract_inline_image(&response).ok_or(GenerationError::NoImageProduced)
}

// ============================================================================
// CLIENT
// ============================================================================

/// Blocking client for one configured model.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    config: GeneratorConfig,
}

impl GeminiClient {
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerationError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::GenerationFailed(e.to_string()))?;
        Ok(GeminiClient { http, config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }
}

impl ImageGenerator for GeminiClient {
    fn generate_image(&self, api_key: &str, prompt: &str) -> Result<String, GenerationError> {
        let url = endpoint_for_model(&self.config.endpoint, &self.config.model);
        let body = build_request(prompt, &self.config);

        tracing::debug!(%url, model = %self.config.model, "POST generateContent");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .map_err(|e| GenerationError::GenerationFailed(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| GenerationError::GenerationFailed(e.to_string()))?;

        if !status.is_success() {
            return Err(classify_failure(status, &text));
        }

        parse_success(&text)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_has_single_text_part_and_image_config() {
        let config = GeneratorConfig::default();
        let body = serde_json::to_value(build_request("hello", &config)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"].as_array().unwrap().len(), 1);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["imageConfig"]["aspectRatio"], "9:16");
        assert_eq!(body["generationConfig"]["imageConfig"]["imageSize"], "1K");
    }

    #[test]
    fn endpoint_adds_models_prefix_once() {
        assert_eq!(
            endpoint_for_model("https://api.test/v1beta/", "gemini-x"),
            "https://api.test/v1beta/models/gemini-x:generateContent"
        );
        assert_eq!(
            endpoint_for_model("https://api.test/v1beta", "models/gemini-x"),
            "https://api.test/v1beta/models/gemini-x:generateContent"
        );
    }

    #[test]
    fn extracts_first_inline_image_after_text() {
        let body = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Here is your wallpaper" },
                        { "inlineData": { "mimeType": "image/png", "data": "FIRST" } },
                        { "inlineData": { "mimeType": "image/png", "data": "SECOND" } }
                    ]
                }
            }]
        }"#;
        assert_eq!(parse_success(body).unwrap(), "data:image/png;base64,FIRST");
    }

    #[test]
    fn accepts_snake_case_inline_data() {
        let body = r#"{"candidates":[{"content":{"parts":[{"inline_data":{"mime_type":"image/jpeg","data":"JPG"}}]}}]}"#;
        assert_eq!(parse_success(body).unwrap(), "data:image/jpeg;base64,JPG");
    }

    #[test]
    fn missing_mime_defaults_to_png() {
        let body = r#"{"candidates":[{"content":{"parts":[{"inlineData":{"data":"RAW"}}]}}]}"#;
        assert_eq!(parse_success(body).unwrap(), "data:image/png;base64,RAW");
    }

    #[test]
    fn zero_image_parts_is_no_image_produced() {
        let text_only = r#"{"candidates":[{"content":{"parts":[{"text":"I can't draw that"}]}}]}"#;
        assert_eq!(parse_success(text_only), Err(GenerationError::NoImageProduced));

        let no_candidates = r#"{"candidates":[]}"#;
        assert_eq!(parse_success(no_candidates), Err(GenerationError::NoImageProduced));

        let empty = r#"{}"#;
        assert_eq!(parse_success(empty), Err(GenerationError::NoImageProduced));
    }

    #[test]
    fn empty_data_parts_are_skipped() {
        let body = r#"{"candidates":[{"content":{"parts":[
            {"inlineData":{"mimeType":"image/png","data":""}},
            {"inlineData":{"mimeType":"image/png","data":"REAL"}}
        ]}}]}"#;
        assert_eq!(parse_success(body).unwrap(), "data:image/png;base64,REAL");
    }

    #[test]
    fn undecodable_body_is_generation_failed() {
        assert!(matches!(
            parse_success("<html>"),
            Err(GenerationError::GenerationFailed(_))
        ));
    }

    #[test]
    fn entity_not_found_is_authentication_required() {
        let body = r#"{"error":{"code":404,"message":"Requested entity was not found.","status":"NOT_FOUND"}}"#;
        assert_eq!(
            classify_failure(StatusCode::NOT_FOUND, body),
            GenerationError::AuthenticationRequired
        );
    }

    #[test]
    fn other_errors_carry_the_service_message() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        match classify_failure(StatusCode::TOO_MANY_REQUESTS, body) {
            GenerationError::GenerationFailed(msg) => {
                assert!(msg.contains("429"));
                assert!(msg.contains("Quota exceeded"));
            }
            other => panic!("Expected GenerationFailed, got {:?}", other),
        }
    }

    #[test]
    fn plain_text_error_body_is_kept() {
        match classify_failure(StatusCode::BAD_GATEWAY, "upstream down") {
            GenerationError::GenerationFailed(msg) => assert!(msg.contains("upstream down")),
            other => panic!("Expected GenerationFailed, got {:?}", other),
        }
    }
}
