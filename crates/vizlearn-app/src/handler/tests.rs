//! Tests for handler module

use std::sync::Arc;

use super::*;
use crate::message::Message;
use crate::quiz::AnswerResult;
use crate::state::{
    AppState, RequestKind, Screen, GENERATION_FAILED_MESSAGE, LOAD_FAILED_MESSAGE,
};
use vizlearn_core::{
    LessonData, LessonStep, LessonSummary, ObjectPatch, ObjectUpdate, QuizQuestion,
    SceneObjectState, SceneTheme, Shape,
};

fn test_question(correct: usize) -> QuizQuestion {
    QuizQuestion {
        question: "What happens next?".to_string(),
        options: vec!["Rain".to_string(), "Snow".to_string(), "Sun".to_string()],
        correct_answer_index: correct,
        explanation: "Clouds get heavy.".to_string(),
    }
}

fn step(id: &str, target: &str, position: [f64; 3]) -> LessonStep {
    LessonStep {
        step_id: id.to_string(),
        explanation: format!("Step {id}"),
        object_updates: vec![ObjectUpdate {
            id: target.to_string(),
            updates: ObjectPatch {
                position: Some(position),
                ..Default::default()
            },
        }],
    }
}

/// Three steps moving one cloud, three quiz questions
fn test_lesson() -> Arc<LessonData> {
    Arc::new(LessonData {
        topic: "Water Cycle".to_string(),
        theme: SceneTheme::Sky,
        initial_objects: vec![SceneObjectState::new("cloud", Shape::Sphere, "#ffffff")],
        steps: vec![
            step("s1", "cloud", [1.0, 0.0, 0.0]),
            step("s2", "cloud", [2.0, 0.0, 0.0]),
            step("s3", "cloud", [3.0, 0.0, 0.0]),
        ],
        quiz: vec![test_question(0), test_question(1), test_question(2)],
    })
}

fn submit(state: &mut AppState) -> UpdateResult {
    update(
        state,
        Message::SubmitTopic {
            topic: "Water Cycle".to_string(),
            age: 7,
        },
    )
}

/// State on EXPLAINING step 0 of `test_lesson()`
fn explaining_state() -> AppState {
    let mut state = AppState::new();
    submit(&mut state);
    update(
        &mut state,
        Message::LessonReady {
            request: RequestKind::Generate,
            lesson: test_lesson(),
        },
    );
    state
}

fn quiz_state() -> AppState {
    let mut state = explaining_state();
    update(&mut state, Message::NextStep);
    update(&mut state, Message::NextStep);
    update(&mut state, Message::StartQuiz);
    assert_eq!(state.screen, Screen::Quiz);
    state
}

// ─────────────────────────────────────────────────────────
// Home / requests
// ─────────────────────────────────────────────────────────

#[test]
fn test_initial_state_is_home() {
    let state = AppState::new();
    assert_eq!(state.screen, Screen::Home);
    assert!(state.lesson.is_none());
    assert!(!state.is_busy());
}

#[test]
fn test_submit_enters_generating_and_requests_lesson() {
    let mut state = AppState::new();
    let result = update(
        &mut state,
        Message::SubmitTopic {
            topic: "  Volcanoes  ".to_string(),
            age: 9,
        },
    );

    assert_eq!(state.screen, Screen::Generating);
    assert_eq!(state.pending, Some(RequestKind::Generate));
    assert_eq!(state.age, 9);
    assert_eq!(
        result.action,
        Some(UpdateAction::GenerateLesson {
            topic: "Volcanoes".to_string(),
            age: 9
        })
    );
}

#[test]
fn test_submit_clears_previous_banner() {
    let mut state = AppState::new();
    state.error = Some(GENERATION_FAILED_MESSAGE.to_string());

    submit(&mut state);

    assert!(state.error.is_none());
}

#[test]
fn test_submit_rejects_blank_topic() {
    let mut state = AppState::new();
    let result = update(
        &mut state,
        Message::SubmitTopic {
            topic: "   ".to_string(),
            age: 7,
        },
    );

    assert_eq!(state.screen, Screen::Home);
    assert!(result.action.is_none());
    assert!(state.error.as_deref().unwrap().contains("topic is required"));
}

#[test]
fn test_identical_rejections_bump_error_revision() {
    let mut state = AppState::new();
    let blank = || Message::LoadLesson {
        filename: " ".to_string(),
    };

    update(&mut state, blank());
    let first = state.error_revision;
    update(&mut state, blank());

    assert_eq!(state.error_revision, first + 1);
    assert!(state.error.is_some());
}

#[test]
fn test_submit_rejects_out_of_range_age() {
    for age in [0, 2, 13] {
        let mut state = AppState::new();
        let result = update(
            &mut state,
            Message::SubmitTopic {
                topic: "Stars".to_string(),
                age,
            },
        );

        assert_eq!(state.screen, Screen::Home);
        assert!(result.action.is_none());
        assert!(state.error.is_some());
    }
}

#[test]
fn test_second_submit_while_busy_is_ignored() {
    let mut state = AppState::new();
    submit(&mut state);

    let result = update(
        &mut state,
        Message::SubmitTopic {
            topic: "Another".to_string(),
            age: 5,
        },
    );
    assert!(result.action.is_none());
    assert_eq!(state.age, 7);

    let result = update(
        &mut state,
        Message::LoadLesson {
            filename: "lesson_x_5_t.json".to_string(),
        },
    );
    assert!(result.action.is_none());
    assert_eq!(state.pending, Some(RequestKind::Generate));
}

#[test]
fn test_load_enters_generating_and_fetches() {
    let mut state = AppState::new();
    let result = update(
        &mut state,
        Message::LoadLesson {
            filename: "lesson_water_cycle_7_t.json".to_string(),
        },
    );

    assert_eq!(state.screen, Screen::Generating);
    assert_eq!(state.pending, Some(RequestKind::Load));
    assert_eq!(
        result.action,
        Some(UpdateAction::FetchLesson {
            filename: "lesson_water_cycle_7_t.json".to_string()
        })
    );
}

#[test]
fn test_load_requires_filename() {
    let mut state = AppState::new();
    let result = update(
        &mut state,
        Message::LoadLesson {
            filename: " ".to_string(),
        },
    );

    assert_eq!(state.screen, Screen::Home);
    assert!(result.action.is_none());
    assert!(state.error.is_some());
}

#[test]
fn test_generation_success_shows_first_step() {
    let state = explaining_state();

    assert_eq!(state.screen, Screen::Explaining);
    assert_eq!(state.step_index, 0);
    assert!(state.pending.is_none());
    assert_eq!(state.current_step().unwrap().step_id, "s1");
}

#[test]
fn test_generation_failure_returns_home_with_banner() {
    let mut state = AppState::new();
    submit(&mut state);

    let result = update(
        &mut state,
        Message::LessonFailed {
            request: RequestKind::Generate,
            error: "Lesson generation failed: empty response".to_string(),
        },
    );

    assert_eq!(state.screen, Screen::Home);
    assert!(!state.is_busy());
    assert_eq!(state.error.as_deref(), Some(GENERATION_FAILED_MESSAGE));
    assert_eq!(result.action, Some(UpdateAction::FetchLessonSummaries));
}

#[test]
fn test_load_failure_uses_load_banner() {
    let mut state = AppState::new();
    update(
        &mut state,
        Message::LoadLesson {
            filename: "missing.json".to_string(),
        },
    );
    update(
        &mut state,
        Message::LessonFailed {
            request: RequestKind::Load,
            error: "Lesson not found: missing.json".to_string(),
        },
    );

    assert_eq!(state.screen, Screen::Home);
    assert_eq!(state.error.as_deref(), Some(LOAD_FAILED_MESSAGE));
}

#[test]
fn test_stale_results_are_ignored() {
    let mut state = AppState::new();

    update(
        &mut state,
        Message::LessonReady {
            request: RequestKind::Generate,
            lesson: test_lesson(),
        },
    );
    assert_eq!(state.screen, Screen::Home);
    assert!(state.lesson.is_none());

    update(
        &mut state,
        Message::LoadLesson {
            filename: "a.json".to_string(),
        },
    );
    update(
        &mut state,
        Message::LessonFailed {
            request: RequestKind::Generate,
            error: "late".to_string(),
        },
    );
    assert_eq!(state.screen, Screen::Generating);
    assert!(state.error.is_none());
}

#[test]
fn test_dismiss_error() {
    let mut state = AppState::new();
    state.error = Some(LOAD_FAILED_MESSAGE.to_string());

    update(&mut state, Message::DismissError);

    assert!(state.error.is_none());
}

#[test]
fn test_refresh_and_list_lessons() {
    let mut state = AppState::new();
    let result = update(&mut state, Message::RefreshLessons);
    assert_eq!(result.action, Some(UpdateAction::FetchLessonSummaries));

    let lessons = vec![LessonSummary {
        filename: "lesson_water_cycle_7_t.json".to_string(),
        topic: "Water Cycle".to_string(),
        age: 7,
        theme: SceneTheme::Sky,
        created_at: "2024-05-01T10:00:00.000Z".to_string(),
    }];
    update(&mut state, Message::LessonsListed { lessons });

    assert_eq!(state.lessons.len(), 1);
    assert_eq!(state.lessons_revision, 1);
}

// ─────────────────────────────────────────────────────────
// Explaining
// ─────────────────────────────────────────────────────────

#[test]
fn test_prev_at_first_step_is_noop() {
    let mut state = explaining_state();
    update(&mut state, Message::PrevStep);
    assert_eq!(state.step_index, 0);
}

#[test]
fn test_next_clamps_at_last_step() {
    let mut state = explaining_state();
    for _ in 0..5 {
        update(&mut state, Message::NextStep);
    }
    assert_eq!(state.step_index, 2);
    assert!(state.is_last_step());

    update(&mut state, Message::PrevStep);
    assert_eq!(state.step_index, 1);
}

#[test]
fn test_resolved_scene_follows_step_index() {
    let mut state = explaining_state();
    assert_eq!(
        state.resolved_scene().unwrap().get("cloud").unwrap().position,
        [1.0, 0.0, 0.0]
    );

    update(&mut state, Message::NextStep);
    assert_eq!(
        state.resolved_scene().unwrap().get("cloud").unwrap().position,
        [2.0, 0.0, 0.0]
    );

    let resolutions = state.scene_resolutions();
    state.resolved_scene();
    assert_eq!(state.scene_resolutions(), resolutions);
}

#[test]
fn test_start_quiz_only_from_last_step() {
    let mut state = explaining_state();
    update(&mut state, Message::StartQuiz);
    assert_eq!(state.screen, Screen::Explaining);

    update(&mut state, Message::NextStep);
    update(&mut state, Message::NextStep);
    update(&mut state, Message::StartQuiz);

    assert_eq!(state.screen, Screen::Quiz);
    assert_eq!(state.quiz.index(), 0);
    assert_eq!(state.quiz.result(), None);
}

#[test]
fn test_back_to_home_from_explaining() {
    let mut state = explaining_state();
    let result = update(&mut state, Message::BackToHome);

    assert_eq!(state.screen, Screen::Home);
    assert!(state.lesson.is_none());
    assert_eq!(result.action, Some(UpdateAction::FetchLessonSummaries));
}

#[test]
fn test_back_to_home_is_noop_while_generating() {
    let mut state = AppState::new();
    submit(&mut state);

    let result = update(&mut state, Message::BackToHome);

    assert_eq!(state.screen, Screen::Generating);
    assert!(state.is_busy());
    assert!(result.action.is_none());
}

// ─────────────────────────────────────────────────────────
// Quiz
// ─────────────────────────────────────────────────────────

#[test]
fn test_answer_correct_and_incorrect() {
    let mut state = quiz_state();
    update(&mut state, Message::AnswerQuestion { option: 0 });
    assert_eq!(state.quiz.result(), Some(AnswerResult::Correct));

    update(&mut state, Message::AdvanceQuiz);
    update(&mut state, Message::AnswerQuestion { option: 0 });
    assert_eq!(state.quiz.result(), Some(AnswerResult::Incorrect));
}

#[test]
fn test_repeat_answer_is_ignored() {
    let mut state = quiz_state();
    update(&mut state, Message::AnswerQuestion { option: 1 });
    update(&mut state, Message::AnswerQuestion { option: 0 });

    assert_eq!(state.quiz.result(), Some(AnswerResult::Incorrect));
    assert_eq!(state.quiz.selected(), Some(1));
}

#[test]
fn test_out_of_range_answer_is_ignored() {
    let mut state = quiz_state();
    update(&mut state, Message::AnswerQuestion { option: 9 });

    assert_eq!(state.quiz.result(), None);
    assert_eq!(state.screen, Screen::Quiz);
}

#[test]
fn test_advance_before_answer_is_ignored() {
    let mut state = quiz_state();
    update(&mut state, Message::AdvanceQuiz);
    assert_eq!(state.quiz.index(), 0);
}

#[test]
fn test_full_quiz_reaches_summary_once() {
    let mut state = quiz_state();
    let mut summary_transitions = 0;

    for correct in [0, 1, 2] {
        update(&mut state, Message::AnswerQuestion { option: correct });
        let before = state.screen;
        update(&mut state, Message::AdvanceQuiz);
        if before == Screen::Quiz && state.screen == Screen::Summary {
            summary_transitions += 1;
        }
    }

    assert_eq!(summary_transitions, 1);
    assert_eq!(state.screen, Screen::Summary);
    assert_eq!(state.score(), (3, 3));
}

#[test]
fn test_back_to_home_from_summary_resets_everything() {
    let mut state = quiz_state();
    for correct in [0, 1, 2] {
        update(&mut state, Message::AnswerQuestion { option: correct });
        update(&mut state, Message::AdvanceQuiz);
    }

    update(&mut state, Message::BackToHome);

    assert_eq!(state.screen, Screen::Home);
    assert!(state.lesson.is_none());
    assert_eq!(state.step_index, 0);
    assert_eq!(state.quiz.index(), 0);
    assert_eq!(state.quiz.result(), None);
    assert_eq!(state.score(), (0, 0));
}

#[test]
fn test_quit_message_sets_quitting() {
    let mut state = AppState::new();
    assert!(!state.should_quit());

    update(&mut state, Message::Quit);

    assert!(state.should_quit());
}
