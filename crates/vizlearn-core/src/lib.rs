//! # vizlearn-core - Core Domain Types
//!
//! Foundation crate for vizlearn. Provides the lesson data model, the
//! step-replay resolver, learner age helpers, error handling and logging.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, regex, tracing).
//!
//! ## Public API
//!
//! ### Lesson Model (`lesson`)
//! - [`LessonData`] - A generated lesson: scene objects, steps and quiz
//! - [`SceneObjectState`] - Full state of one 3D object
//! - [`ObjectUpdate`], [`ObjectPatch`] - Partial per-step object mutations
//! - [`QuizQuestion`] - Multiple-choice question
//! - [`LessonSummary`] - Listing entry for a stored lesson
//!
//! ### Resolver (`resolver`)
//! - [`resolve()`] - Replay steps `0..=k` over the initial objects
//! - [`ResolvedScene`] - Id-indexed snapshot in initial-object order
//! - [`SceneCache`] - Memoizes the last `(lesson, step)` resolution
//!
//! ### Curriculum (`curriculum`)
//! - [`AgeBracket`] - Complexity bracket for a learner age
//! - [`suggested_topics()`] - Starter topics per age
//!
//! ### File Naming (`filename`)
//! - [`lesson_filename()`] - Storage name for a generated lesson
//! - [`validate_lesson_filename()`] - Directory-traversal guard for reads
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use vizlearn_core::prelude::*;
//! ```

pub mod curriculum;
pub mod error;
pub mod filename;
pub mod lesson;
pub mod logging;
pub mod prelude;
pub mod resolver;

// Re-export commonly used types at crate root for convenience
pub use curriculum::{
    normalize_topic, suggested_topics, validate_age, AgeBracket, DEFAULT_AGE, MAX_AGE, MIN_AGE,
};
pub use error::{Error, Result, ResultExt};
pub use filename::{
    lesson_filename, parse_lesson_filename, sanitize_topic, validate_lesson_filename,
    ParsedFilename,
};
pub use lesson::{
    LessonData, LessonStep, LessonSummary, ObjectPatch, ObjectUpdate, QuizQuestion,
    SceneObjectState, SceneTheme, Shape, Vec3,
};
pub use resolver::{apply_step, resolve, ResolvedScene, SceneCache};
