//! Lesson data model
//!
//! A [`LessonData`] is produced once per generation or load request and is
//! treated as immutable for the rest of the session. Field names follow the
//! camelCase JSON contract shared with the generator and the lesson store.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Position, rotation (radians) or scale triple
pub type Vec3 = [f64; 3];

/// Primitive mesh used to draw a scene object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Box,
    Sphere,
    Cylinder,
    Cone,
    Torus,
    Icosahedron,
}

impl Shape {
    pub const ALL: [Shape; 6] = [
        Shape::Box,
        Shape::Sphere,
        Shape::Cylinder,
        Shape::Cone,
        Shape::Torus,
        Shape::Icosahedron,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Box => "box",
            Shape::Sphere => "sphere",
            Shape::Cylinder => "cylinder",
            Shape::Cone => "cone",
            Shape::Torus => "torus",
            Shape::Icosahedron => "icosahedron",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backdrop the renderer uses for the whole lesson
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneTheme {
    Sky,
    Space,
    Forest,
    Sunset,
    City,
}

impl SceneTheme {
    pub const ALL: [SceneTheme; 5] = [
        SceneTheme::Sky,
        SceneTheme::Space,
        SceneTheme::Forest,
        SceneTheme::Sunset,
        SceneTheme::City,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SceneTheme::Sky => "sky",
            SceneTheme::Space => "space",
            SceneTheme::Forest => "forest",
            SceneTheme::Sunset => "sunset",
            SceneTheme::City => "city",
        }
    }
}

impl fmt::Display for SceneTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full state of one scene object at some point of the lesson timeline.
///
/// `id` is the identity; every other field may change from step to step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneObjectState {
    pub id: String,
    pub shape: Shape,
    pub color: String,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    /// 0 = hidden, 1 = fully visible
    pub opacity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl SceneObjectState {
    /// Unit-scale, fully visible object at the origin
    pub fn new(id: impl Into<String>, shape: Shape, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            shape,
            color: color.into(),
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
            opacity: 1.0,
            label: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

/// Partial update over every [`SceneObjectState`] field except `id`.
///
/// A `None` field means "no change". `label` is tri-state: absent keeps the
/// current label, `null` clears it, a string replaces it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<Shape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Vec3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vec3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub label: Option<Option<String>>,
}

/// Maps a present field (including `null`) to `Some`, leaving absence to `default`.
fn deserialize_present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl ObjectPatch {
    /// Merge this patch onto `target`.
    ///
    /// Every field present in the patch is applied, zero vectors and empty
    /// colors included.
    pub fn apply_to(&self, target: &mut SceneObjectState) {
        if let Some(shape) = self.shape {
            target.shape = shape;
        }
        if let Some(color) = &self.color {
            target.color.clone_from(color);
        }
        if let Some(position) = self.position {
            target.position = position;
        }
        if let Some(rotation) = self.rotation {
            target.rotation = rotation;
        }
        if let Some(scale) = self.scale {
            target.scale = scale;
        }
        if let Some(opacity) = self.opacity {
            target.opacity = opacity;
        }
        if let Some(label) = &self.label {
            target.label.clone_from(label);
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A patch addressed to one object by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectUpdate {
    pub id: String,
    #[serde(default)]
    pub updates: ObjectPatch,
}

/// One explanation step and the object mutations it performs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonStep {
    pub step_id: String,
    pub explanation: String,
    /// Applied in order; later updates to the same id win per field
    #[serde(default)]
    pub object_updates: Vec<ObjectUpdate>,
}

/// Multiple-choice question shown after the last step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
    /// Shown after answering
    pub explanation: String,
}

impl QuizQuestion {
    pub fn is_correct(&self, option_index: usize) -> bool {
        option_index == self.correct_answer_index
    }

    pub fn correct_option(&self) -> Option<&str> {
        self.options
            .get(self.correct_answer_index)
            .map(String::as_str)
    }
}

/// A complete generated lesson
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonData {
    pub topic: String,
    pub theme: SceneTheme,
    pub initial_objects: Vec<SceneObjectState>,
    pub steps: Vec<LessonStep>,
    pub quiz: Vec<QuizQuestion>,
}

impl LessonData {
    /// Parse and validate a lesson from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        let lesson: LessonData = serde_json::from_str(text)?;
        lesson.validate()?;
        Ok(lesson)
    }

    /// Index of the final explanation step (0 for an empty lesson)
    pub fn last_step_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn step(&self, index: usize) -> Option<&LessonStep> {
        self.steps.get(index)
    }

    pub fn question(&self, index: usize) -> Option<&QuizQuestion> {
        self.quiz.get(index)
    }

    /// Check the structural invariants a playable lesson needs.
    ///
    /// Updates that reference unknown object ids are tolerated here; see
    /// [`LessonData::unknown_update_ids`].
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for object in &self.initial_objects {
            if !seen.insert(object.id.as_str()) {
                return Err(Error::invalid_lesson(format!(
                    "duplicate object id '{}'",
                    object.id
                )));
            }
            if !(0.0..=1.0).contains(&object.opacity) {
                return Err(Error::invalid_lesson(format!(
                    "object '{}' has opacity {} outside [0, 1]",
                    object.id, object.opacity
                )));
            }
        }

        if self.steps.is_empty() {
            return Err(Error::invalid_lesson("lesson has no steps"));
        }
        if self.quiz.is_empty() {
            return Err(Error::invalid_lesson("lesson has no quiz questions"));
        }

        for (i, question) in self.quiz.iter().enumerate() {
            if question.options.len() < 2 {
                return Err(Error::invalid_lesson(format!(
                    "question {} has {} option(s), need at least 2",
                    i + 1,
                    question.options.len()
                )));
            }
            if question.correct_answer_index >= question.options.len() {
                return Err(Error::invalid_lesson(format!(
                    "question {} marks option {} correct but has {} options",
                    i + 1,
                    question.correct_answer_index,
                    question.options.len()
                )));
            }
        }

        Ok(())
    }

    /// Ids referenced by step updates that no initial object carries
    pub fn unknown_update_ids(&self) -> Vec<&str> {
        let known: HashSet<&str> = self.initial_objects.iter().map(|o| o.id.as_str()).collect();
        let mut unknown: Vec<&str> = Vec::new();
        for update in self.steps.iter().flat_map(|s| &s.object_updates) {
            if !known.contains(update.id.as_str()) && !unknown.contains(&update.id.as_str()) {
                unknown.push(update.id.as_str());
            }
        }
        unknown
    }
}

/// Listing entry for a stored lesson
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonSummary {
    pub filename: String,
    pub topic: String,
    pub age: u8,
    pub theme: SceneTheme,
    pub created_at: String,
}
