//! REST-backed lesson service

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;
use vizlearn_core::prelude::*;
use vizlearn_core::{validate_lesson_filename, LessonData, LessonSummary};

use super::LessonService;

const GENERATE_PATH: [&str; 2] = ["api", "generate-lesson"];
const LESSONS_PATH: [&str; 2] = ["api", "generated-lessons"];

#[derive(Serialize)]
struct GenerateRequest<'a> {
    topic: &'a str,
    age: u8,
}

/// `{ "error": "..." }` body returned by the server on failure
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// [`LessonService`] that talks to a vizlearn REST server
#[derive(Debug, Clone)]
pub struct HttpLessonService {
    client: Client,
    base_url: Url,
}

impl HttpLessonService {
    /// Create a service for the server at `server_url` (e.g. `http://localhost:3001`)
    pub fn new(server_url: &str) -> Result<Self> {
        let base_url = Url::parse(server_url)
            .map_err(|e| Error::config(format!("Invalid server URL '{}': {}", server_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(format!(
                "Server URL '{}' cannot be used as a base",
                server_url
            )));
        }

        let client = Client::builder()
            .user_agent(concat!("vizlearn/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL with `segments` appended, each percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => format!("server responded with {}", status),
        }
    }
}

impl LessonService for HttpLessonService {
    async fn generate_lesson(&self, topic: &str, age: u8) -> Result<LessonData> {
        let url = self.endpoint(&GENERATE_PATH);
        debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .json(&GenerateRequest { topic, age })
            .send()
            .await
            .map_err(|e| Error::generation(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::generation(Self::error_message(response).await));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::generation(format!("failed to read response: {}", e)))?;

        LessonData::from_json(&body)
            .map_err(|e| Error::generation(format!("server returned an unusable lesson: {}", e)))
    }

    async fn fetch_lesson(&self, filename: &str) -> Result<LessonData> {
        let filename = validate_lesson_filename(filename)?;
        let url = self.endpoint(&[LESSONS_PATH[0], LESSONS_PATH[1], filename]);
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::http(format!("request failed: {}", e)))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Err(Error::not_found(filename)),
            StatusCode::BAD_REQUEST => {
                return Err(Error::invalid_input(Self::error_message(response).await))
            }
            _ => return Err(Error::http(Self::error_message(response).await)),
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("failed to read response: {}", e)))?;
        LessonData::from_json(&body)
    }

    async fn fetch_lesson_summaries(&self) -> Vec<LessonSummary> {
        let url = self.endpoint(&LESSONS_PATH);
        debug!("GET {}", url);

        let response = match self.client.get(url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                warn!("Lesson listing failed: {}", response.status());
                return Vec::new();
            }
            Err(e) => {
                warn!("Lesson listing failed: {}", e);
                return Vec::new();
            }
        };

        match response.json::<Vec<LessonSummary>>().await {
            Ok(lessons) => lessons,
            Err(e) => {
                warn!("Lesson listing was not understood: {}", e);
                Vec::new()
            }
        }
    }
}
