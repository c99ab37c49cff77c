//! Message types for the application (TEA pattern)

use std::sync::Arc;

use vizlearn_core::{LessonData, LessonSummary};

use crate::state::RequestKind;

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    // ─────────────────────────────────────────────────────────
    // Home
    // ─────────────────────────────────────────────────────────
    /// Ask for a new lesson on `topic` pitched at `age`
    SubmitTopic { topic: String, age: u8 },

    /// Open a previously generated lesson by filename
    LoadLesson { filename: String },

    /// Re-fetch the stored lesson list
    RefreshLessons,

    /// Stored lesson list arrived (empty on collaborator failure)
    LessonsListed { lessons: Vec<LessonSummary> },

    /// Hide the error banner
    DismissError,

    // ─────────────────────────────────────────────────────────
    // Collaborator Results
    // ─────────────────────────────────────────────────────────
    LessonReady {
        request: RequestKind,
        lesson: Arc<LessonData>,
    },

    LessonFailed { request: RequestKind, error: String },

    // ─────────────────────────────────────────────────────────
    // Explaining
    // ─────────────────────────────────────────────────────────
    NextStep,
    PrevStep,
    StartQuiz,

    // ─────────────────────────────────────────────────────────
    // Quiz
    // ─────────────────────────────────────────────────────────
    AnswerQuestion { option: usize },
    AdvanceQuiz,

    /// Leave the lesson (EXPLAINING, QUIZ or SUMMARY) for HOME
    BackToHome,

    Quit,
}
