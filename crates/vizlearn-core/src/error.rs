//! Application error types with rich context

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Collaborator Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Lesson generation failed: {message}")]
    Generation { message: String },

    #[error("Lesson not found: {filename}")]
    NotFound { filename: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("HTTP error: {message}")]
    Http { message: String },

    #[error("Request timed out after {secs}s")]
    Timeout { secs: u64 },

    // ─────────────────────────────────────────────────────────────
    // Lesson Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid lesson: {message}")]
    InvalidLesson { message: String },

    // ─────────────────────────────────────────────────────────────
    // Quiz Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Question {question} has already been answered")]
    AlreadyAnswered { question: usize },

    #[error("Question {question} has not been answered yet")]
    NotAnswered { question: usize },

    #[error("Answer index {index} is out of range for {options} options")]
    AnswerOutOfRange { index: usize, options: usize },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing credentials: set {var}")]
    MissingCredentials { var: String },

    // ─────────────────────────────────────────────────────────────
    // Server Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Server error: {message}")]
    Server { message: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    pub fn not_found(filename: impl Into<String>) -> Self {
        Self::NotFound {
            filename: filename.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
        }
    }

    pub fn invalid_lesson(message: impl Into<String>) -> Self {
        Self::InvalidLesson {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn missing_credentials(var: impl Into<String>) -> Self {
        Self::MissingCredentials { var: var.into() }
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error
    ///
    /// Everything a user can trigger from the lesson screens lands here: the
    /// app shows a banner and returns to a usable state.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Generation { .. }
                | Error::NotFound { .. }
                | Error::InvalidInput { .. }
                | Error::InvalidLesson { .. }
                | Error::Http { .. }
                | Error::Timeout { .. }
                | Error::AlreadyAnswered { .. }
                | Error::NotAnswered { .. }
                | Error::AnswerOutOfRange { .. }
        )
    }

    /// Check if this error should trigger application exit
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Server { .. } | Error::Config { .. })
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions (for use with color-eyre)
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}
