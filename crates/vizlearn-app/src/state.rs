//! Application state (Model in TEA pattern)

use std::sync::Arc;

use serde::Serialize;
use vizlearn_core::{
    LessonData, LessonStep, LessonSummary, QuizQuestion, ResolvedScene, SceneCache, DEFAULT_AGE,
};

use crate::config::Settings;
use crate::quiz::QuizState;

/// Banner shown when a generate request fails
pub const GENERATION_FAILED_MESSAGE: &str =
    "Oops! Something went wrong while building your world. Please try again.";

/// Banner shown when loading a stored lesson fails
pub const LOAD_FAILED_MESSAGE: &str = "Could not load the selected lesson.";

/// Which screen is active
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Screen {
    #[default]
    Home,
    /// Waiting on a generate or load request
    Generating,
    Explaining,
    Quiz,
    Summary,
}

/// Kind of collaborator request that put the app into `Generating`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Generate,
    Load,
}

impl RequestKind {
    /// User-facing banner for a failed request of this kind
    pub fn failure_message(&self) -> &'static str {
        match self {
            RequestKind::Generate => GENERATION_FAILED_MESSAGE,
            RequestKind::Load => LOAD_FAILED_MESSAGE,
        }
    }
}

/// Complete application state (the Model in TEA)
#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,

    /// Lesson being explained or quizzed; `None` on HOME and while generating
    pub lesson: Option<Arc<LessonData>>,

    /// 0-based explanation step
    pub step_index: usize,

    pub quiz: QuizState,

    /// Dismissable error banner
    pub error: Option<String>,

    /// Bumped every time a banner is raised, even with unchanged text
    pub error_revision: u64,

    /// In-flight request, doubles as the busy flag
    pub pending: Option<RequestKind>,

    /// Stored lessons offered on HOME
    pub lessons: Vec<LessonSummary>,

    /// Bumped every time `lessons` is replaced
    pub lessons_revision: u64,

    /// Learner age of the most recent submission
    pub age: u8,

    pub settings: Settings,

    scene_cache: SceneCache,
    quitting: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(Settings::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            screen: Screen::Home,
            lesson: None,
            step_index: 0,
            quiz: QuizState::new(),
            error: None,
            error_revision: 0,
            pending: None,
            lessons: Vec::new(),
            lessons_revision: 0,
            age: DEFAULT_AGE,
            settings,
            scene_cache: SceneCache::new(),
            quitting: false,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn should_quit(&self) -> bool {
        self.quitting
    }

    pub fn request_quit(&mut self) {
        self.quitting = true;
    }

    pub fn current_step(&self) -> Option<&LessonStep> {
        self.lesson.as_ref()?.step(self.step_index)
    }

    pub fn last_step_index(&self) -> Option<usize> {
        self.lesson.as_ref().map(|l| l.last_step_index())
    }

    pub fn is_last_step(&self) -> bool {
        self.last_step_index() == Some(self.step_index)
    }

    /// The quiz is only offered from the final explanation step
    pub fn can_start_quiz(&self) -> bool {
        self.screen == Screen::Explaining && self.is_last_step()
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.lesson.as_ref()?.question(self.quiz.index())
    }

    pub fn quiz_len(&self) -> usize {
        self.lesson.as_ref().map_or(0, |l| l.quiz.len())
    }

    /// `(correct, total)` for the SUMMARY screen
    pub fn score(&self) -> (usize, usize) {
        (self.quiz.correct_count(), self.quiz_len())
    }

    /// Objects as they stand after the current step, memoized per step
    pub fn resolved_scene(&mut self) -> Option<&ResolvedScene> {
        let lesson = self.lesson.as_ref()?;
        Some(self.scene_cache.get_or_resolve(lesson, self.step_index))
    }

    /// Number of times the scene had to be recomputed
    pub fn scene_resolutions(&self) -> u64 {
        self.scene_cache.misses()
    }

    pub(crate) fn begin_request(&mut self, kind: RequestKind) {
        self.error = None;
        self.pending = Some(kind);
        self.screen = Screen::Generating;
    }

    pub(crate) fn show_lesson(&mut self, lesson: Arc<LessonData>) {
        self.pending = None;
        self.lesson = Some(lesson);
        self.step_index = 0;
        self.quiz.reset();
        self.scene_cache.clear();
        self.screen = Screen::Explaining;
    }

    /// Discard the lesson and every index derived from it
    pub(crate) fn enter_home(&mut self) {
        self.lesson = None;
        self.step_index = 0;
        self.quiz.reset();
        self.scene_cache.clear();
        self.pending = None;
        self.screen = Screen::Home;
    }

    pub(crate) fn show_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.error_revision += 1;
    }

    pub(crate) fn set_lessons(&mut self, lessons: Vec<LessonSummary>) {
        self.lessons = lessons;
        self.lessons_revision += 1;
    }
}
