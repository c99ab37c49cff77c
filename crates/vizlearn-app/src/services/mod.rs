//! Service layer for vizlearn
//!
//! The state machine never talks to the network itself. Every
//! `UpdateAction` is carried out through a [`LessonService`], so the
//! headless runner, tests and any future frontend share one contract:
//!
//! ```text
//! ┌────────────┐  UpdateAction  ┌───────────────┐   HTTP   ┌──────────────┐
//! │  handler   │ ─────────────▶ │ LessonService │ ───────▶ │ REST server  │
//! └────────────┘                └───────────────┘          └──────────────┘
//! ```
//!
//! ## Key Components
//!
//! - [`LessonService`]: generate / fetch / list lessons
//! - [`HttpLessonService`]: implementation backed by the REST API

mod http;

pub use http::HttpLessonService;

use vizlearn_core::prelude::*;
use vizlearn_core::{LessonData, LessonSummary};

/// Lesson collaborator operations
///
/// Implementations must return validated lessons.
#[trait_variant::make(LessonService: Send)]
pub trait LocalLessonService {
    /// Generate a new lesson. Network failures, missing credentials and
    /// malformed model output all surface as `Error::Generation`.
    async fn generate_lesson(&self, topic: &str, age: u8) -> Result<LessonData>;

    /// Fetch a stored lesson; `Error::NotFound` if there is no such file
    async fn fetch_lesson(&self, filename: &str) -> Result<LessonData>;

    /// List stored lessons, newest first. Never fails: errors yield an empty list.
    async fn fetch_lesson_summaries(&self) -> Vec<LessonSummary>;
}
