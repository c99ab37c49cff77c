//! Headless mode - JSON event output for scripted play
//!
//! `vizlearn play` drives the lesson state machine from stdin commands and
//! writes structured JSON events to stdout.
//!
//! # Event Format
//!
//! Events are output as NDJSON (newline-delimited JSON), one event per line.
//! Each event has an "event" field indicating its type, along with event-specific data.
//!
//! # Example Output
//!
//! ```json
//! {"event":"screen","from":"HOME","to":"GENERATING","timestamp":1704700001000}
//! {"event":"step","topic":"Water Cycle","step_index":0,"last_step_index":4,"explanation":"...","objects":[...],"timestamp":1704700002000}
//! {"event":"answered","index":0,"selected":1,"result":"correct","correct_answer_index":1,"explanation":"...","timestamp":1704700003000}
//! ```

pub mod command;
pub mod runner;

use chrono::Utc;
use serde::Serialize;
use std::io::{self, Write};
use tracing::error;

use vizlearn_app::{AnswerResult, EngineEvent, Screen};
use vizlearn_core::{LessonSummary, SceneObjectState};

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// Runner is up and reading stdin
    Ready { server_url: String, timestamp: i64 },

    /// Active screen changed
    Screen {
        from: Screen,
        to: Screen,
        timestamp: i64,
    },

    /// Current lesson step with every object resolved through it
    Step {
        topic: String,
        step_index: usize,
        last_step_index: usize,
        explanation: String,
        objects: Vec<SceneObjectState>,
        timestamp: i64,
    },

    /// Current quiz question
    Question {
        index: usize,
        total: usize,
        question: String,
        options: Vec<String>,
        timestamp: i64,
    },

    /// Feedback for the answered question
    Answered {
        index: usize,
        selected: usize,
        result: AnswerResult,
        correct_answer_index: usize,
        explanation: String,
        timestamp: i64,
    },

    /// Quiz finished
    Summary {
        correct: usize,
        total: usize,
        timestamp: i64,
    },

    /// Stored lessons available to `load`
    Lessons {
        lessons: Vec<LessonSummary>,
        timestamp: i64,
    },

    /// Starter topics for an age
    Topics {
        age: u8,
        topics: Vec<String>,
        timestamp: i64,
    },

    /// Error occurred
    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },

    /// Runner is exiting
    Shutdown { timestamp: i64 },
}

impl HeadlessEvent {
    /// Emit this event to stdout as JSON
    pub fn emit(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        // Write to stdout with newline (NDJSON format)
        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            error!("Failed to write headless event to stdout: {}", e);
            return;
        }

        // Flush to ensure immediate output
        if let Err(e) = stdout.flush() {
            error!("Failed to flush headless stdout: {}", e);
        }
    }

    /// Get current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    // ─────────────────────────────────────────────────────────
    // Convenience constructors
    // ─────────────────────────────────────────────────────────

    pub fn ready(server_url: &str) -> Self {
        Self::Ready {
            server_url: server_url.to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn topics(age: u8, topics: &[&str]) -> Self {
        Self::Topics {
            age,
            topics: topics.iter().map(|t| t.to_string()).collect(),
            timestamp: Self::now(),
        }
    }

    pub fn error(message: String, fatal: bool) -> Self {
        Self::Error {
            message,
            fatal,
            timestamp: Self::now(),
        }
    }
}

impl From<EngineEvent> for HeadlessEvent {
    fn from(event: EngineEvent) -> Self {
        let timestamp = Self::now();
        match event {
            EngineEvent::ScreenChanged { from, to } => Self::Screen {
                from,
                to,
                timestamp,
            },
            EngineEvent::StepChanged {
                topic,
                step_index,
                last_step_index,
                explanation,
                objects,
            } => Self::Step {
                topic,
                step_index,
                last_step_index,
                explanation,
                objects,
                timestamp,
            },
            EngineEvent::QuestionShown {
                index,
                total,
                question,
            } => Self::Question {
                index,
                total,
                question: question.question,
                options: question.options,
                timestamp,
            },
            EngineEvent::Answered {
                index,
                selected,
                result,
                correct_answer_index,
                explanation,
            } => Self::Answered {
                index,
                selected,
                result,
                correct_answer_index,
                explanation,
                timestamp,
            },
            EngineEvent::QuizCompleted { correct, total } => Self::Summary {
                correct,
                total,
                timestamp,
            },
            EngineEvent::ErrorShown { message } => Self::Error {
                message,
                fatal: false,
                timestamp,
            },
            EngineEvent::LessonsUpdated { lessons } => Self::Lessons { lessons, timestamp },
            EngineEvent::Shutdown => Self::Shutdown { timestamp },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vizlearn_core::{QuizQuestion, Shape};

    fn to_value(event: HeadlessEvent) -> serde_json::Value {
        let json = serde_json::to_string(&event).expect("serialization failed");
        serde_json::from_str(&json).expect("invalid JSON")
    }

    #[test]
    fn test_screen_serialization() {
        let value = to_value(
            EngineEvent::ScreenChanged {
                from: Screen::Home,
                to: Screen::Generating,
            }
            .into(),
        );

        assert_eq!(value["event"], "screen");
        assert_eq!(value["from"], "HOME");
        assert_eq!(value["to"], "GENERATING");
        assert!(value["timestamp"].is_number());
    }

    #[test]
    fn test_step_serialization_uses_lesson_field_names() {
        let value = to_value(
            EngineEvent::StepChanged {
                topic: "Sunrise".to_string(),
                step_index: 1,
                last_step_index: 3,
                explanation: "The sun climbs.".to_string(),
                objects: vec![SceneObjectState::new("sun", Shape::Sphere, "#ffcc00")],
            }
            .into(),
        );

        assert_eq!(value["event"], "step");
        assert_eq!(value["step_index"], 1);
        assert_eq!(value["objects"][0]["id"], "sun");
        assert_eq!(value["objects"][0]["shape"], "sphere");
        assert_eq!(value["objects"][0]["opacity"], 1.0);
    }

    #[test]
    fn test_question_hides_answer() {
        let value = to_value(
            EngineEvent::QuestionShown {
                index: 0,
                total: 3,
                question: QuizQuestion {
                    question: "Which is hot?".to_string(),
                    options: vec!["Sun".to_string(), "Ice".to_string()],
                    correct_answer_index: 0,
                    explanation: "The sun is a star.".to_string(),
                },
            }
            .into(),
        );

        assert_eq!(value["event"], "question");
        assert_eq!(value["options"][1], "Ice");
        assert!(value.get("correct_answer_index").is_none());
        assert!(value.get("explanation").is_none());
    }

    #[test]
    fn test_answered_serialization() {
        let value = to_value(
            EngineEvent::Answered {
                index: 2,
                selected: 1,
                result: AnswerResult::Incorrect,
                correct_answer_index: 0,
                explanation: "Because.".to_string(),
            }
            .into(),
        );

        assert_eq!(value["event"], "answered");
        assert_eq!(value["result"], "incorrect");
        assert_eq!(value["correct_answer_index"], 0);
    }

    #[test]
    fn test_error_serialization() {
        let value = to_value(HeadlessEvent::error("Connection failed".to_string(), true));

        assert_eq!(value["event"], "error");
        assert_eq!(value["message"], "Connection failed");
        assert_eq!(value["fatal"], true);
    }

    #[test]
    fn test_topics_serialization() {
        let value = to_value(HeadlessEvent::topics(4, &["Farm Animals"]));

        assert_eq!(value["event"], "topics");
        assert_eq!(value["age"], 4);
        assert_eq!(value["topics"][0], "Farm Animals");
    }
}
