//! Domain events emitted by the Engine for external consumers
//!
//! Events are broadcast after each message processing cycle via
//! `Engine::subscribe()`. The headless runner turns them into NDJSON.

use vizlearn_core::{LessonSummary, QuizQuestion, SceneObjectState};

use crate::quiz::AnswerResult;
use crate::state::Screen;

/// Domain events emitted by the Engine for external consumers.
///
/// Events are broadcast after each message processing cycle, so subscribers
/// see a consistent view of state changes.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The active screen changed
    ScreenChanged { from: Screen, to: Screen },

    /// A lesson step became current (on entering EXPLAINING or moving steps)
    StepChanged {
        topic: String,
        step_index: usize,
        last_step_index: usize,
        explanation: String,
        /// Objects resolved through `step_index`
        objects: Vec<SceneObjectState>,
    },

    /// A quiz question became current
    QuestionShown {
        index: usize,
        total: usize,
        question: QuizQuestion,
    },

    /// The current question was answered
    Answered {
        index: usize,
        selected: usize,
        result: AnswerResult,
        correct_answer_index: usize,
        explanation: String,
    },

    /// The quiz ended; SUMMARY is showing
    QuizCompleted { correct: usize, total: usize },

    /// A new error banner is showing
    ErrorShown { message: String },

    /// The stored lesson list was refreshed
    LessonsUpdated { lessons: Vec<LessonSummary> },

    /// The engine is shutting down
    Shutdown,
}

impl EngineEvent {
    /// Short name for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            EngineEvent::ScreenChanged { .. } => "screen_changed",
            EngineEvent::StepChanged { .. } => "step_changed",
            EngineEvent::QuestionShown { .. } => "question_shown",
            EngineEvent::Answered { .. } => "answered",
            EngineEvent::QuizCompleted { .. } => "quiz_completed",
            EngineEvent::ErrorShown { .. } => "error_shown",
            EngineEvent::LessonsUpdated { .. } => "lessons_updated",
            EngineEvent::Shutdown => "shutdown",
        }
    }
}
