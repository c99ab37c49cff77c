//! Lesson generation through the Gemini `generateContent` API

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use vizlearn_core::prelude::*;
use vizlearn_core::LessonData;

use crate::prompt::{build_prompt, response_schema};

/// Produces lessons from a topic and learner age
///
/// Every failure, including malformed model output, is `Error::Generation`.
#[trait_variant::make(LessonGenerator: Send)]
pub trait LocalLessonGenerator {
    async fn generate(&self, topic: &str, age: u8) -> Result<LessonData>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeminiConfig {
    pub model: String,
    pub api_base_url: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            api_base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout: Duration::from_secs(80),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Gemini REST client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
    api_key: Option<String>,
}

impl GeminiClient {
    /// A missing `api_key` is reported on each generate call, not here, so the
    /// server can still serve stored lessons.
    pub fn new(config: GeminiConfig, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn request_body(topic: &str, age: u8) -> Value {
        json!({
            "contents": [{ "parts": [{ "text": build_prompt(topic, age) }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema(),
            },
        })
    }
}

impl LessonGenerator for GeminiClient {
    async fn generate(&self, topic: &str, age: u8) -> Result<LessonData> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::generation("Missing GEMINI_API_KEY (or API_KEY)"))?;

        debug!("generateContent with {} for '{}'", self.config.model, topic);
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&Self::request_body(topic, age))
            .send()
            .await
            .map_err(|e| Error::generation(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::generation(format!("Failed to read Gemini response: {}", e)))?;

        if !status.is_success() {
            return Err(Error::generation(format!(
                "Gemini returned {}: {}",
                status,
                api_error_message(&body)
            )));
        }

        lesson_from_response(&body)
    }
}

/// `error.message` of a Google API error body, or the raw body
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Extract and validate the lesson carried in a `generateContent` response
pub(crate) fn lesson_from_response(body: &str) -> Result<LessonData> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| Error::generation(format!("Unexpected Gemini response: {}", e)))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(Error::generation("No response text from Gemini"));
    }

    LessonData::from_json(&text).map_err(|e| {
        warn!("Model output rejected: {}", e);
        Error::generation(format!("Model output did not match the lesson schema: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LESSON_JSON: &str = r##"{
        "topic": "Planets",
        "theme": "space",
        "initialObjects": [
            {"id": "sun", "shape": "sphere", "color": "#ffaa00",
             "position": [0, 0, 0], "rotation": [0, 0, 0], "scale": [2, 2, 2], "opacity": 1}
        ],
        "steps": [
            {"stepId": "1", "explanation": "This is the sun.", "objectUpdates": []}
        ],
        "quiz": [
            {"question": "Is the sun a star?", "options": ["Yes", "No"],
             "correctAnswerIndex": 0, "explanation": "It is."}
        ]
    }"##;

    fn wrap(text: &str) -> String {
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] }).to_string()
    }

    #[test]
    fn test_lesson_from_response() {
        let lesson = lesson_from_response(&wrap(LESSON_JSON)).unwrap();
        assert_eq!(lesson.topic, "Planets");
        assert_eq!(lesson.initial_objects[0].scale, [2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_empty_candidates_is_generation_error() {
        let err = lesson_from_response(r#"{"candidates": []}"#).unwrap_err();
        assert!(matches!(err, Error::Generation { .. }));
        assert!(err.to_string().contains("No response text"));
    }

    #[test]
    fn test_invalid_json_text_is_generation_error() {
        let err = lesson_from_response(&wrap("{not json")).unwrap_err();
        assert!(matches!(err, Error::Generation { .. }));
    }

    #[test]
    fn test_schema_mismatch_is_generation_error() {
        let err = lesson_from_response(&wrap(r#"{"topic": "x"}"#)).unwrap_err();
        assert!(matches!(err, Error::Generation { .. }));
    }

    #[test]
    fn test_api_error_message() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid"}}"#;
        assert_eq!(api_error_message(body), "API key not valid");
        assert_eq!(api_error_message("gateway down\n"), "gateway down");
    }

    #[test]
    fn test_endpoint() {
        let client = GeminiClient::new(
            GeminiConfig {
                api_base_url: "http://localhost:8080/".to_string(),
                ..Default::default()
            },
            None,
        )
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:8080/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let client = GeminiClient::new(GeminiConfig::default(), None).unwrap();
        let err = LessonGenerator::generate(&client, "Planets", 7)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Generation { .. }));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_request_body_asks_for_json() {
        let body = GeminiClient::request_body("Planets", 7);
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert!(body["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Planets"));
    }
}
