//! vizlearn-server - REST boundary for vizlearn
//!
//! - `routes`: axum router (`/api/generate-lesson`, `/api/generated-lessons`)
//! - `store`: flat-file JSON lesson store
//! - `prompt`: age-bracketed prompt and response schema
//! - `gemini`: [`LessonGenerator`] trait and the Gemini client implementing it

pub mod gemini;
pub mod prompt;
pub mod routes;
pub mod store;

pub use gemini::{GeminiClient, GeminiConfig, LessonGenerator, LocalLessonGenerator};
pub use routes::{router, run_server, start_server_on, ApiError, ServerState};
pub use store::LessonStore;
