//! Flat-file lesson store
//!
//! One pretty-printed JSON file per generated lesson, named by
//! [`lesson_filename`]. Reads go through [`validate_lesson_filename`] so a
//! request can never leave the store directory.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use vizlearn_core::prelude::*;
use vizlearn_core::{
    lesson_filename, parse_lesson_filename, validate_lesson_filename, LessonData, LessonSummary,
    SceneTheme,
};

/// The parts of a stored lesson the listing needs
#[derive(Deserialize)]
struct LessonHeader {
    topic: String,
    theme: SceneTheme,
}

#[derive(Debug, Clone)]
pub struct LessonStore {
    dir: PathBuf,
}

impl LessonStore {
    /// Open the store at `dir`, creating the directory if needed
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create lesson directory {:?}", dir))?;
        debug!("Lesson store at {:?}", dir);
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save `lesson` under a fresh filename, returning that filename
    pub async fn save(&self, topic: &str, age: u8, lesson: &LessonData) -> Result<String> {
        self.save_at(topic, age, lesson, Utc::now()).await
    }

    pub async fn save_at(
        &self,
        topic: &str,
        age: u8,
        lesson: &LessonData,
        created_at: DateTime<Utc>,
    ) -> Result<String> {
        let filename = lesson_filename(topic, age, created_at);
        let path = self.dir.join(&filename);
        let json = serde_json::to_string_pretty(lesson)?;

        tokio::fs::write(&path, json).await?;
        info!("Saved lesson to {:?}", path);
        Ok(filename)
    }

    /// Load a stored lesson; `Error::NotFound` if the file does not exist
    pub async fn load(&self, filename: &str) -> Result<LessonData> {
        let filename = validate_lesson_filename(filename)?;
        let path = self.dir.join(filename);

        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::not_found(filename))
            }
            Err(e) => return Err(e.into()),
        };

        LessonData::from_json(&text)
    }

    /// Summaries of every readable stored lesson, newest first
    pub async fn list(&self) -> Result<Vec<LessonSummary>> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut found: Vec<(Option<DateTime<Utc>>, LessonSummary)> = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let filename = entry.file_name().to_string_lossy().into_owned();
            let Some(parsed) = parse_lesson_filename(&filename) else {
                trace!("Skipping foreign file {}", filename);
                continue;
            };

            let header = match tokio::fs::read_to_string(entry.path()).await {
                Ok(text) => serde_json::from_str::<LessonHeader>(&text),
                Err(e) => {
                    warn!("Skipping unreadable lesson {}: {}", filename, e);
                    continue;
                }
            };
            let header = match header {
                Ok(header) => header,
                Err(e) => {
                    warn!("Skipping malformed lesson {}: {}", filename, e);
                    continue;
                }
            };

            let created_at = parsed
                .created_at
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
                .unwrap_or_default();

            found.push((
                parsed.created_at,
                LessonSummary {
                    filename,
                    topic: header.topic,
                    age: parsed.age,
                    theme: header.theme,
                    created_at,
                },
            ));
        }

        found.sort_by(|(a_time, a), (b_time, b)| {
            b_time.cmp(a_time).then_with(|| b.filename.cmp(&a.filename))
        });
        Ok(found.into_iter().map(|(_, summary)| summary).collect())
    }
}
