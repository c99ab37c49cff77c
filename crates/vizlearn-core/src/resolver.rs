//! Step-replay state resolution
//!
//! The scene shown for step `k` is derived by copying the lesson's initial
//! objects and replaying the updates of steps `0..=k` in order. Snapshots are
//! always rebuilt from the initial objects, so the lesson itself is never
//! mutated and each [`ResolvedScene`] owns independent copies.

use std::collections::HashMap;
use std::sync::Arc;

use crate::lesson::{LessonData, LessonStep, SceneObjectState};

/// Resolved object states for one step, keyed by id in initial-object order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedScene {
    objects: Vec<SceneObjectState>,
    index: HashMap<String, usize>,
}

impl ResolvedScene {
    /// Deep-copy the initial objects into a fresh scene
    pub fn from_initial(initial: &[SceneObjectState]) -> Self {
        let mut scene = Self {
            objects: Vec::with_capacity(initial.len()),
            index: HashMap::with_capacity(initial.len()),
        };
        for object in initial {
            // First occurrence wins; validated lessons never carry duplicates
            if scene.index.contains_key(&object.id) {
                continue;
            }
            scene.index.insert(object.id.clone(), scene.objects.len());
            scene.objects.push(object.clone());
        }
        scene
    }

    pub fn get(&self, id: &str) -> Option<&SceneObjectState> {
        self.index.get(id).map(|&i| &self.objects[i])
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut SceneObjectState> {
        match self.index.get(id) {
            Some(&i) => self.objects.get_mut(i),
            None => None,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneObjectState> {
        self.objects.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.objects.iter().map(|o| o.id.as_str())
    }

    /// Objects with non-zero opacity
    pub fn visible(&self) -> impl Iterator<Item = &SceneObjectState> {
        self.objects.iter().filter(|o| o.is_visible())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn as_slice(&self) -> &[SceneObjectState] {
        &self.objects
    }

    pub fn into_vec(self) -> Vec<SceneObjectState> {
        self.objects
    }
}

/// Apply one step's updates, in order, onto `scene`.
///
/// Updates for ids the scene does not contain are skipped.
/// Returns how many updates were skipped.
pub fn apply_step(scene: &mut ResolvedScene, step: &LessonStep) -> usize {
    let mut skipped = 0;
    for update in &step.object_updates {
        match scene.get_mut(&update.id) {
            Some(object) => update.updates.apply_to(object),
            None => {
                tracing::trace!(
                    "step {}: ignoring update for unknown object '{}'",
                    step.step_id,
                    update.id
                );
                skipped += 1;
            }
        }
    }
    skipped
}

/// Resolve object states after replaying steps `0..=step_index`.
///
/// An index past the last step replays every available step.
pub fn resolve(
    initial: &[SceneObjectState],
    steps: &[LessonStep],
    step_index: usize,
) -> ResolvedScene {
    let mut scene = ResolvedScene::from_initial(initial);
    for step in steps.iter().take(step_index.saturating_add(1)) {
        apply_step(&mut scene, step);
    }
    scene
}

impl LessonData {
    /// Resolve this lesson's scene at `step_index`
    pub fn resolve_step(&self, step_index: usize) -> ResolvedScene {
        resolve(&self.initial_objects, &self.steps, step_index)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    lesson: Arc<LessonData>,
    step_index: usize,
    scene: ResolvedScene,
}

/// Memoizes the most recent resolution keyed by lesson identity and step index.
///
/// Lesson identity is the `Arc` allocation, so loading a new lesson (even an
/// identical one) always misses.
#[derive(Debug, Clone, Default)]
pub struct SceneCache {
    entry: Option<CacheEntry>,
    misses: u64,
}

impl SceneCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the scene for `(lesson, step_index)`, resolving on a miss
    pub fn get_or_resolve(&mut self, lesson: &Arc<LessonData>, step_index: usize) -> &ResolvedScene {
        let entry = match self.entry.take() {
            Some(entry) if Arc::ptr_eq(&entry.lesson, lesson) && entry.step_index == step_index => {
                entry
            }
            _ => {
                self.misses += 1;
                CacheEntry {
                    lesson: Arc::clone(lesson),
                    step_index,
                    scene: lesson.resolve_step(step_index),
                }
            }
        };
        &self.entry.insert(entry).scene
    }

    /// Last resolved scene, if any
    pub fn current(&self) -> Option<&ResolvedScene> {
        self.entry.as_ref().map(|e| &e.scene)
    }

    /// Number of resolutions performed (cache misses)
    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}
