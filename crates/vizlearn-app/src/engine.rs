//! Engine - shared orchestration state for frontends
//!
//! The Engine owns the TEA state, the message channel, the lesson service and
//! the settings. Frontends feed it messages and subscribe to `EngineEvent`s.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tracing::debug;

use crate::config::Settings;
use crate::engine_event::EngineEvent;
use crate::message::Message;
use crate::process;
use crate::services::LessonService;
use crate::state::{AppState, Screen};

/// Lightweight snapshot of state for change detection.
///
/// Captured before message processing, compared after to detect
/// what changed and emit appropriate EngineEvents.
#[derive(Debug, Clone, PartialEq)]
struct StateSnapshot {
    screen: Screen,
    step_index: usize,
    quiz_index: usize,
    answered: bool,
    error_revision: u64,
    lessons_revision: u64,
}

impl StateSnapshot {
    fn capture(state: &AppState) -> Self {
        Self {
            screen: state.screen,
            step_index: state.step_index,
            quiz_index: state.quiz.index(),
            answered: state.quiz.is_answered(),
            error_revision: state.error_revision,
            lessons_revision: state.lessons_revision,
        }
    }
}

/// Orchestration engine for vizlearn.
pub struct Engine<S> {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Sender half of the unified message channel.
    /// Clone this to give to input sources.
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the unified message channel.
    pub msg_rx: mpsc::Receiver<Message>,

    /// Collaborator used for every UpdateAction
    service: Arc<S>,

    /// Loaded settings
    pub settings: Settings,

    /// Event broadcaster for external consumers.
    event_tx: broadcast::Sender<EngineEvent>,
}

impl<S> Engine<S>
where
    S: LessonService + Send + Sync + 'static,
{
    /// Create an engine around `service`.
    ///
    /// Creates the message channel (capacity 256) and the event broadcast
    /// channel (capacity 256).
    pub fn new(settings: Settings, service: S) -> Self {
        let state = AppState::with_settings(settings.clone());
        let (msg_tx, msg_rx) = mpsc::channel::<Message>(256);
        let (event_tx, _) = broadcast::channel(256);

        Self {
            state,
            msg_tx,
            msg_rx,
            service: Arc::new(service),
            settings,
            event_tx,
        }
    }

    /// Subscribe to engine events.
    ///
    /// If the subscriber falls behind (buffer full), older events are
    /// dropped. Use `broadcast::error::RecvError::Lagged` to detect this.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Kick off startup work: HOME shows the stored lesson list.
    pub fn start(&mut self) {
        self.process_message(Message::RefreshLessons);
    }

    /// Process a single message through the TEA update cycle and emit
    /// events for whatever changed.
    pub fn process_message(&mut self, msg: Message) {
        let pre = StateSnapshot::capture(&self.state);

        process::process_message(&mut self.state, msg, &self.msg_tx, &self.service);

        let post = StateSnapshot::capture(&self.state);
        if pre != post {
            self.emit_events(&pre, &post);
        }
    }

    /// Drain and process all pending messages from the channel.
    ///
    /// Returns the number of messages processed.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    /// Wait for the next message from any input source or background task.
    pub async fn next_message(&mut self) -> Option<Message> {
        self.msg_rx.recv().await
    }

    /// Get a clone of the message sender for spawning input sources.
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    pub fn service(&self) -> &Arc<S> {
        &self.service
    }

    /// Check if the application should quit.
    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    /// Notify subscribers that the engine is going away.
    pub fn shutdown(&self) {
        self.emit(EngineEvent::Shutdown);
    }

    /// Compare pre/post snapshots and emit the matching events.
    fn emit_events(&mut self, pre: &StateSnapshot, post: &StateSnapshot) {
        if pre.screen != post.screen {
            self.emit(EngineEvent::ScreenChanged {
                from: pre.screen,
                to: post.screen,
            });
        }

        if post.screen == Screen::Explaining
            && (pre.screen != Screen::Explaining || pre.step_index != post.step_index)
        {
            self.emit_step();
        }

        if post.screen == Screen::Quiz {
            if pre.screen != Screen::Quiz || pre.quiz_index != post.quiz_index {
                self.emit_question();
            }
            if post.answered && (!pre.answered || pre.quiz_index != post.quiz_index) {
                self.emit_answer();
            }
        }

        if post.screen == Screen::Summary && pre.screen != Screen::Summary {
            let (correct, total) = self.state.score();
            self.emit(EngineEvent::QuizCompleted { correct, total });
        }

        if pre.error_revision != post.error_revision {
            if let Some(message) = &self.state.error {
                self.emit(EngineEvent::ErrorShown {
                    message: message.clone(),
                });
            }
        }

        if pre.lessons_revision != post.lessons_revision {
            self.emit(EngineEvent::LessonsUpdated {
                lessons: self.state.lessons.clone(),
            });
        }
    }

    fn emit_step(&mut self) {
        let Some(lesson) = self.state.lesson.clone() else {
            return;
        };
        let step_index = self.state.step_index;
        let explanation = lesson
            .step(step_index)
            .map(|s| s.explanation.clone())
            .unwrap_or_default();
        let objects = self
            .state
            .resolved_scene()
            .map(|scene| scene.as_slice().to_vec())
            .unwrap_or_default();

        self.emit(EngineEvent::StepChanged {
            topic: lesson.topic.clone(),
            step_index,
            last_step_index: lesson.last_step_index(),
            explanation,
            objects,
        });
    }

    fn emit_question(&self) {
        if let Some(question) = self.state.current_question() {
            self.emit(EngineEvent::QuestionShown {
                index: self.state.quiz.index(),
                total: self.state.quiz_len(),
                question: question.clone(),
            });
        }
    }

    fn emit_answer(&self) {
        let quiz = &self.state.quiz;
        if let (Some(question), Some(result), Some(selected)) =
            (self.state.current_question(), quiz.result(), quiz.selected())
        {
            self.emit(EngineEvent::Answered {
                index: quiz.index(),
                selected,
                result,
                correct_answer_index: question.correct_answer_index,
                explanation: question.explanation.clone(),
            });
        }
    }

    /// Emit a single EngineEvent to all subscribers.
    ///
    /// send() returns Err only if there are no receivers.
    fn emit(&self, event: EngineEvent) {
        debug!("EngineEvent: {}", event.event_type());
        let _ = self.event_tx.send(event);
    }
}
