//! vizlearn-app - Application state and orchestration for vizlearn
//!
//! This crate implements the TEA (The Elm Architecture) pattern for the lesson
//! state machine, the quiz controller, the Engine abstraction for shared
//! orchestration, configuration loading and the lesson service trait.

pub mod actions;
pub mod config;
pub mod engine;
pub mod engine_event;
pub mod handler;
pub mod message;
pub mod process;
pub mod quiz;
pub mod services;
pub mod state;

// Re-export primary types
pub use engine::Engine;
pub use engine_event::EngineEvent;
pub use handler::{UpdateAction, UpdateResult};
pub use message::Message;
pub use quiz::{AnswerResult, QuizProgress, QuizState};
pub use services::{HttpLessonService, LessonService, LocalLessonService};
pub use state::{AppState, RequestKind, Screen};
