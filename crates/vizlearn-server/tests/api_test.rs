//! Integration tests for the lesson REST API.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::task::JoinHandle;
use vizlearn_core::{
    Error, LessonData, LessonStep, QuizQuestion, Result, SceneObjectState, SceneTheme, Shape,
};
use vizlearn_server::{start_server_on, LessonGenerator, LessonStore, ServerState};

/// Generator that fails for the topic "explode" and counts calls
#[derive(Default)]
struct FakeGenerator {
    calls: AtomicUsize,
}

fn lesson(topic: &str) -> LessonData {
    LessonData {
        topic: topic.to_string(),
        theme: SceneTheme::Sunset,
        initial_objects: vec![SceneObjectState::new("ball", Shape::Sphere, "red")],
        steps: vec![LessonStep {
            step_id: "1".to_string(),
            explanation: "Here is a ball.".to_string(),
            object_updates: vec![],
        }],
        quiz: vec![QuizQuestion {
            question: "What color is the ball?".to_string(),
            options: vec!["Red".to_string(), "Blue".to_string()],
            correct_answer_index: 0,
            explanation: "It is red.".to_string(),
        }],
    }
}

impl LessonGenerator for FakeGenerator {
    async fn generate(&self, topic: &str, _age: u8) -> Result<LessonData> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if topic == "explode" {
            Err(Error::generation("No response text from Gemini"))
        } else {
            Ok(lesson(topic))
        }
    }
}

struct TestServer {
    base: String,
    dir: TempDir,
    handle: JoinHandle<()>,
}

impl TestServer {
    async fn start() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = LessonStore::open(dir.path()).await.unwrap();
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let (addr, handle) = start_server_on(addr, ServerState::new(store, FakeGenerator::default()))
            .await
            .expect("Failed to start lesson server");

        Self {
            base: format!("http://{}", addr),
            dir,
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn stored_files(&self) -> Vec<String> {
        std::fs::read_dir(self.dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn post_generate(server: &TestServer, body: Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(server.url("/api/generate-lesson"))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request")
}

#[tokio::test]
async fn test_generate_returns_lesson_and_saves_it() {
    let server = TestServer::start().await;

    let response = post_generate(&server, json!({ "topic": "Red Ball", "age": 4 })).await;
    assert_eq!(response.status(), 200);

    let body: LessonData = response.json().await.unwrap();
    assert_eq!(body, lesson("Red Ball"));

    let files = server.stored_files();
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("lesson_red_ball_4_"));
    assert!(files[0].ends_with(".json"));
}

#[tokio::test]
async fn test_stored_filename_uses_trimmed_topic() {
    let server = TestServer::start().await;

    let response = post_generate(&server, json!({ "topic": "  Red Ball ", "age": 4 })).await;
    assert_eq!(response.status(), 200);

    let files = server.stored_files();
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("lesson_red_ball_4_"), "file: {}", files[0]);
}

#[tokio::test]
async fn test_generate_requires_topic_and_age() {
    let server = TestServer::start().await;

    for body in [
        json!({ "topic": "", "age": 7 }),
        json!({ "topic": "   ", "age": 7 }),
        json!({ "topic": "Stars" }),
        json!({ "topic": "Stars", "age": 0 }),
        json!({ "age": 7 }),
    ] {
        let response = post_generate(&server, body.clone()).await;
        assert_eq!(response.status(), 400, "body: {body}");
        let error: Value = response.json().await.unwrap();
        assert_eq!(error["error"], "Topic and age are required");
    }

    assert!(server.stored_files().is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let server = TestServer::start().await;

    let response = reqwest::Client::new()
        .post(server.url("/api/generate-lesson"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let error: Value = response.json().await.unwrap();
    assert!(error["error"].is_string());
}

#[tokio::test]
async fn test_generation_failure_is_server_error() {
    let server = TestServer::start().await;

    let response = post_generate(&server, json!({ "topic": "explode", "age": 9 })).await;

    assert_eq!(response.status(), 500);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["error"], "No response text from Gemini");
    assert!(server.stored_files().is_empty());
}

#[tokio::test]
async fn test_list_and_fetch_stored_lessons() {
    let server = TestServer::start().await;
    post_generate(&server, json!({ "topic": "Volcanoes", "age": 10 })).await;

    let response = reqwest::get(server.url("/api/generated-lessons"))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let listing: Value = response.json().await.unwrap();
    let entries = listing.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["topic"], "Volcanoes");
    assert_eq!(entries[0]["age"], 10);
    assert_eq!(entries[0]["theme"], "sunset");
    assert!(entries[0]["createdAt"].as_str().unwrap().ends_with('Z'));

    let filename = entries[0]["filename"].as_str().unwrap();
    let response = reqwest::get(server.url(&format!("/api/generated-lessons/{filename}")))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let fetched: LessonData = response.json().await.unwrap();
    assert_eq!(fetched.topic, "Volcanoes");
}

#[tokio::test]
async fn test_fetch_rejects_bad_filenames() {
    let server = TestServer::start().await;

    for name in ["..secret.json", "lesson.txt", "%2E%2E%2Fsecret.json"] {
        let response = reqwest::get(server.url(&format!("/api/generated-lessons/{name}")))
            .await
            .unwrap();
        assert_eq!(response.status(), 400, "filename: {name}");
    }
}

#[tokio::test]
async fn test_fetch_missing_lesson_is_not_found() {
    let server = TestServer::start().await;

    let response = reqwest::get(server.url("/api/generated-lessons/lesson_none_5_x.json"))
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    let error: Value = response.json().await.unwrap();
    assert!(error["error"].as_str().unwrap().contains("lesson_none_5_x.json"));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let server = TestServer::start().await;

    let response = reqwest::Client::new()
        .get(server.url("/api/generated-lessons"))
        .header("origin", "http://localhost:5173")
        .send()
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
