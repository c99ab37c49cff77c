//! HTTP routes for the lesson REST API.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use vizlearn_core::prelude::*;

use crate::gemini::LessonGenerator;
use crate::store::LessonStore;

/// Shared state for the route handlers.
pub struct ServerState<G> {
    pub store: Arc<LessonStore>,
    pub generator: Arc<G>,
}

impl<G> ServerState<G> {
    pub fn new(store: LessonStore, generator: G) -> Self {
        Self {
            store: Arc::new(store),
            generator: Arc::new(generator),
        }
    }
}

// Manual impl: `G` itself need not be Clone
impl<G> Clone for ServerState<G> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            generator: Arc::clone(&self.generator),
        }
    }
}

/// `{ "error": message }` with a status code
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match err {
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = match err {
            Error::Generation { message } | Error::InvalidInput { message } => message,
            other => other.to_string(),
        };
        Self { status, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    age: Option<u8>,
}

/// Build the API router with permissive CORS.
pub fn router<G>(state: ServerState<G>) -> Router
where
    G: LessonGenerator + Send + Sync + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/generate-lesson", post(generate_lesson::<G>))
        .route("/api/generated-lessons", get(list_lessons::<G>))
        .route("/api/generated-lessons/:filename", get(get_lesson::<G>))
        .layer(cors)
        .with_state(state)
}

/// Bind `addr` and serve in a background task.
///
/// Returns the bound address (useful with port 0) and the server task.
pub async fn start_server_on<G>(
    addr: SocketAddr,
    state: ServerState<G>,
) -> Result<(SocketAddr, JoinHandle<()>)>
where
    G: LessonGenerator + Send + Sync + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::server(format!("Failed to bind {}: {}", addr, e)))?;
    let actual_addr = listener.local_addr()?;
    let app = router(state);

    info!("Lesson server listening on http://{}", actual_addr);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Lesson server error: {}", e);
        }
    });

    Ok((actual_addr, handle))
}

/// Serve on `addr` until Ctrl+C.
pub async fn run_server<G>(addr: SocketAddr, state: ServerState<G>) -> Result<()>
where
    G: LessonGenerator + Send + Sync + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::server(format!("Failed to bind {}: {}", addr, e)))?;
    info!("Lesson server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl+C: {}", e);
            }
            info!("Shutting down lesson server");
        })
        .await
        .map_err(|e| Error::server(e.to_string()))
}

async fn generate_lesson<G>(
    State(state): State<ServerState<G>>,
    body: std::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> std::result::Result<Response, ApiError>
where
    G: LessonGenerator + Send + Sync + 'static,
{
    let Json(request) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let topic = request
        .topic
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    let (topic, age) = match (topic, request.age.filter(|a| *a > 0)) {
        (Some(topic), Some(age)) => (topic.to_string(), age),
        _ => return Err(ApiError::bad_request("Topic and age are required")),
    };

    info!("Generating lesson for topic: \"{}\", age: {}", topic, age);
    let lesson = state.generator.generate(&topic, age).await.map_err(|e| {
        error!("Lesson generation failed: {}", e);
        ApiError::from(e)
    })?;

    if let Err(e) = state.store.save(&topic, age, &lesson).await {
        warn!("Could not save lesson to file: {}", e);
    }

    Ok(Json(lesson).into_response())
}

async fn list_lessons<G>(
    State(state): State<ServerState<G>>,
) -> std::result::Result<Response, ApiError> {
    let lessons = state.store.list().await?;
    Ok(Json(lessons).into_response())
}

async fn get_lesson<G>(
    State(state): State<ServerState<G>>,
    Path(filename): Path<String>,
) -> std::result::Result<Response, ApiError> {
    let lesson = state.store.load(&filename).await?;
    Ok(Json(lesson).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let err = ApiError::from(Error::not_found("x.json"));
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err = ApiError::from(Error::invalid_input("bad name"));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "bad name");

        let err = ApiError::from(Error::generation("No response text from Gemini"));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "No response text from Gemini");
    }
}
