//! Lesson file naming
//!
//! Stored lessons are named `lesson_{topic}_{age}_{timestamp}.json` where the
//! topic is lowercased with every non-alphanumeric character replaced by `_`
//! and the timestamp is a UTC instant with `:` and `.` replaced by `-`.

use std::sync::LazyLock;

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;

use crate::error::{Error, Result};

const PREFIX: &str = "lesson_";
const EXTENSION: &str = ".json";

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]").expect("Invalid topic sanitizer regex"));

/// Lowercase `topic` and replace every non `[A-Za-z0-9]` character with `_`
pub fn sanitize_topic(topic: &str) -> String {
    NON_ALPHANUMERIC.replace_all(topic, "_").to_lowercase()
}

/// Build the storage filename for a lesson generated at `created_at`
pub fn lesson_filename(topic: &str, age: u8, created_at: DateTime<Utc>) -> String {
    let timestamp = created_at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{PREFIX}{}_{age}_{timestamp}{EXTENSION}", sanitize_topic(topic))
}

/// Reject names that could escape the lesson directory
pub fn validate_lesson_filename(filename: &str) -> Result<&str> {
    if filename.is_empty() {
        return Err(Error::invalid_input("filename is required"));
    }
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(Error::invalid_input(format!(
            "invalid lesson filename '{filename}'"
        )));
    }
    if !filename.ends_with(EXTENSION) {
        return Err(Error::invalid_input(format!(
            "lesson filename must end with {EXTENSION}"
        )));
    }
    Ok(filename)
}

/// Parts recoverable from a stored lesson's filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFilename {
    pub sanitized_topic: String,
    pub age: u8,
    pub created_at: Option<DateTime<Utc>>,
}

/// Split a filename produced by [`lesson_filename`] back into its parts.
///
/// The topic may itself contain underscores, so age and timestamp are taken
/// from the right.
pub fn parse_lesson_filename(filename: &str) -> Option<ParsedFilename> {
    let stem = filename.strip_prefix(PREFIX)?.strip_suffix(EXTENSION)?;
    let mut parts = stem.rsplitn(3, '_');
    let timestamp = parts.next()?;
    let age = parts.next()?.parse().ok()?;
    let sanitized_topic = parts.next()?.to_string();

    Some(ParsedFilename {
        sanitized_topic,
        age,
        created_at: parse_timestamp(timestamp),
    })
}

/// Undo the `:`/`.` substitution of `2024-05-01T10-00-00-000Z`
fn parse_timestamp(timestamp: &str) -> Option<DateTime<Utc>> {
    let (date, time) = timestamp.split_once('T')?;
    let mut pieces = time.splitn(4, '-');
    let (hour, minute, second, fraction) =
        (pieces.next()?, pieces.next()?, pieces.next()?, pieces.next()?);
    let rfc3339 = format!("{date}T{hour}:{minute}:{second}.{fraction}");
    DateTime::parse_from_rfc3339(&rfc3339)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
