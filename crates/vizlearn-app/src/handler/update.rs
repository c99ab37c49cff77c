//! Main update function - handles state transitions (TEA pattern)

use super::{lesson, quiz, UpdateAction, UpdateResult};
use crate::message::Message;
use crate::state::AppState;

/// Process a message and update state.
/// Returns an optional action for the event loop to perform.
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::SubmitTopic { topic, age } => lesson::handle_submit_topic(state, &topic, age),

        Message::LoadLesson { filename } => lesson::handle_load_lesson(state, filename),

        Message::RefreshLessons => UpdateResult::action(UpdateAction::FetchLessonSummaries),

        Message::LessonsListed { lessons } => {
            tracing::debug!("Lesson list refreshed: {} entries", lessons.len());
            state.set_lessons(lessons);
            UpdateResult::none()
        }

        Message::DismissError => {
            state.error = None;
            UpdateResult::none()
        }

        Message::LessonReady { request, lesson } => {
            lesson::handle_lesson_ready(state, request, lesson)
        }

        Message::LessonFailed { request, error } => {
            lesson::handle_lesson_failed(state, request, &error)
        }

        Message::NextStep => lesson::handle_next_step(state),

        Message::PrevStep => lesson::handle_prev_step(state),

        Message::StartQuiz => quiz::handle_start_quiz(state),

        Message::AnswerQuestion { option } => quiz::handle_answer(state, option),

        Message::AdvanceQuiz => quiz::handle_advance(state),

        Message::BackToHome => lesson::handle_back_to_home(state),

        Message::Quit => {
            state.request_quit();
            UpdateResult::none()
        }
    }
}
