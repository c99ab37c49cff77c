//! Quiz screen handlers

use vizlearn_core::prelude::*;

use super::UpdateResult;
use crate::quiz::QuizProgress;
use crate::state::{AppState, Screen};

pub fn handle_start_quiz(state: &mut AppState) -> UpdateResult {
    if !state.can_start_quiz() {
        debug!(
            "Quiz not available on {:?} at step {}",
            state.screen, state.step_index
        );
        return UpdateResult::none();
    }

    state.quiz.reset();
    state.screen = Screen::Quiz;
    UpdateResult::none()
}

/// Answer the current question; rejected answers leave state untouched
pub fn handle_answer(state: &mut AppState, option: usize) -> UpdateResult {
    if state.screen != Screen::Quiz {
        return UpdateResult::none();
    }
    let Some(lesson) = state.lesson.as_ref() else {
        return UpdateResult::none();
    };

    match state.quiz.answer(&lesson.quiz, option) {
        Ok(result) => debug!(
            "Question {} answered with option {}: {:?}",
            state.quiz.index(),
            option,
            result
        ),
        Err(e) => warn!("Ignoring answer: {}", e),
    }
    UpdateResult::none()
}

pub fn handle_advance(state: &mut AppState) -> UpdateResult {
    if state.screen != Screen::Quiz {
        return UpdateResult::none();
    }

    match state.quiz.advance(state.quiz_len()) {
        Ok(QuizProgress::Next(index)) => debug!("Advanced to question {}", index),
        Ok(QuizProgress::Finished) => {
            let (correct, total) = state.score();
            info!("Quiz finished: {}/{}", correct, total);
            state.screen = Screen::Summary;
        }
        Err(e) => warn!("Ignoring advance: {}", e),
    }
    UpdateResult::none()
}
