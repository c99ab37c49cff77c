//! Home screen, lesson request and explanation step handlers

use std::sync::Arc;

use vizlearn_core::prelude::*;
use vizlearn_core::{normalize_topic, validate_age, LessonData};

use super::{UpdateAction, UpdateResult};
use crate::state::{AppState, RequestKind, Screen};

/// Handle a topic submission from HOME
pub fn handle_submit_topic(state: &mut AppState, topic: &str, age: u8) -> UpdateResult {
    if let Some(pending) = state.pending {
        debug!("Ignoring submit while a {:?} request is in flight", pending);
        return UpdateResult::none();
    }
    if state.screen != Screen::Home {
        debug!("Ignoring submit on {:?}", state.screen);
        return UpdateResult::none();
    }

    let validated = normalize_topic(topic).and_then(|t| validate_age(age).map(|a| (t, a)));
    let (topic, age) = match validated {
        Ok(pair) => pair,
        Err(e) => {
            warn!("Rejected submission: {}", e);
            state.show_error(e.to_string());
            return UpdateResult::none();
        }
    };

    info!("Generating lesson on '{}' for age {}", topic, age);
    state.age = age;
    state.begin_request(RequestKind::Generate);
    UpdateResult::action(UpdateAction::GenerateLesson { topic, age })
}

/// Handle a request to open a stored lesson from HOME
pub fn handle_load_lesson(state: &mut AppState, filename: String) -> UpdateResult {
    if let Some(pending) = state.pending {
        debug!("Ignoring load while a {:?} request is in flight", pending);
        return UpdateResult::none();
    }
    if state.screen != Screen::Home {
        debug!("Ignoring load on {:?}", state.screen);
        return UpdateResult::none();
    }

    let filename = filename.trim().to_string();
    if filename.is_empty() {
        state.show_error(Error::invalid_input("filename is required").to_string());
        return UpdateResult::none();
    }

    info!("Loading lesson {}", filename);
    state.begin_request(RequestKind::Load);
    UpdateResult::action(UpdateAction::FetchLesson { filename })
}

pub fn handle_lesson_ready(
    state: &mut AppState,
    request: RequestKind,
    lesson: Arc<LessonData>,
) -> UpdateResult {
    if state.pending != Some(request) {
        debug!("Dropping stale {:?} result", request);
        return UpdateResult::none();
    }

    let unknown = lesson.unknown_update_ids();
    if !unknown.is_empty() {
        warn!(
            "Lesson '{}' updates unknown objects {:?}; those updates are ignored",
            lesson.topic, unknown
        );
    }

    info!(
        "Lesson '{}' ready: {} objects, {} steps, {} questions",
        lesson.topic,
        lesson.initial_objects.len(),
        lesson.steps.len(),
        lesson.quiz.len()
    );
    state.show_lesson(lesson);
    UpdateResult::none()
}

/// Revert to HOME with the banner for `request`
pub fn handle_lesson_failed(state: &mut AppState, request: RequestKind, error: &str) -> UpdateResult {
    if state.pending != Some(request) {
        debug!("Dropping stale {:?} failure: {}", request, error);
        return UpdateResult::none();
    }

    warn!("{:?} request failed: {}", request, error);
    state.enter_home();
    state.show_error(request.failure_message());
    UpdateResult::action(UpdateAction::FetchLessonSummaries)
}

pub fn handle_next_step(state: &mut AppState) -> UpdateResult {
    if state.screen != Screen::Explaining {
        return UpdateResult::none();
    }
    if let Some(last) = state.last_step_index() {
        state.step_index = (state.step_index + 1).min(last);
    }
    UpdateResult::none()
}

pub fn handle_prev_step(state: &mut AppState) -> UpdateResult {
    if state.screen == Screen::Explaining {
        state.step_index = state.step_index.saturating_sub(1);
    }
    UpdateResult::none()
}

/// Leave the lesson; a no-op from HOME and while a request is pending
pub fn handle_back_to_home(state: &mut AppState) -> UpdateResult {
    match state.screen {
        Screen::Explaining | Screen::Quiz | Screen::Summary => {
            state.enter_home();
            UpdateResult::action(UpdateAction::FetchLessonSummaries)
        }
        Screen::Home | Screen::Generating => UpdateResult::none(),
    }
}
