//! Quiz controller: answer/advance sub-state machine for the QUIZ screen

use serde::Serialize;
use vizlearn_core::prelude::*;
use vizlearn_core::QuizQuestion;

/// Outcome of answering the current question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerResult {
    Correct,
    Incorrect,
}

/// Where `advance` left the quiz
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizProgress {
    /// Moved on to the question at this index
    Next(usize),
    /// The last question was advanced past; the quiz is over
    Finished,
}

/// Progress through a lesson's quiz.
///
/// `result` is `None` until the current question is answered and is reset
/// every time `index` moves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizState {
    index: usize,
    result: Option<AnswerResult>,
    selected: Option<usize>,
    correct_count: usize,
}

impl QuizState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 0-based index of the current question
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn result(&self) -> Option<AnswerResult> {
        self.result
    }

    /// Option chosen for the current question, once answered
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_answered(&self) -> bool {
        self.result.is_some()
    }

    /// Number of questions answered correctly so far
    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    /// Answer the current question of `quiz`.
    ///
    /// Rejects a second answer to the same question and option indices the
    /// question does not have; neither changes state.
    pub fn answer(&mut self, quiz: &[QuizQuestion], option_index: usize) -> Result<AnswerResult> {
        if self.result.is_some() {
            return Err(Error::AlreadyAnswered {
                question: self.index,
            });
        }

        let question = quiz.get(self.index).ok_or_else(|| {
            Error::invalid_lesson(format!("quiz has no question {}", self.index))
        })?;

        if option_index >= question.options.len() {
            return Err(Error::AnswerOutOfRange {
                index: option_index,
                options: question.options.len(),
            });
        }

        let result = if question.is_correct(option_index) {
            self.correct_count += 1;
            AnswerResult::Correct
        } else {
            AnswerResult::Incorrect
        };

        self.result = Some(result);
        self.selected = Some(option_index);
        Ok(result)
    }

    /// Move past an answered question in a quiz of `total` questions
    pub fn advance(&mut self, total: usize) -> Result<QuizProgress> {
        if self.result.is_none() {
            return Err(Error::NotAnswered {
                question: self.index,
            });
        }

        self.result = None;
        self.selected = None;

        if self.index + 1 >= total {
            Ok(QuizProgress::Finished)
        } else {
            self.index += 1;
            Ok(QuizProgress::Next(self.index))
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
