//! Learner ages, complexity brackets and suggested topics

use crate::error::{Error, Result};

pub const MIN_AGE: u8 = 3;
pub const MAX_AGE: u8 = 12;
pub const DEFAULT_AGE: u8 = 7;

/// Complexity bracket used when prompting the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBracket {
    /// Ages 3-5
    Preschool,
    /// Ages 6-8
    EarlyElementary,
    /// Ages 9-12
    Preteen,
}

impl AgeBracket {
    pub fn for_age(age: u8) -> Self {
        match age {
            0..=5 => AgeBracket::Preschool,
            6..=8 => AgeBracket::EarlyElementary,
            _ => AgeBracket::Preteen,
        }
    }

    /// Language, visual and quiz guidance for the generator
    pub fn instructions(&self) -> &'static str {
        match self {
            AgeBracket::Preschool => {
                "Target Age 3-5 (Toddler/Preschool): Use very simple language, short sentences. \
                 Use primary colors. Visuals should be big and simple. Keep steps few (3-4 max). \
                 Quiz should be very easy matching."
            }
            AgeBracket::EarlyElementary => {
                "Target Age 6-8 (Early Elementary): Use simple but complete sentences. \
                 Visuals can have some detail. Steps can be 4-6. Quiz can ask about facts."
            }
            AgeBracket::Preteen => {
                "Target Age 9-12 (Late Elementary/Pre-teen): Use richer vocabulary. \
                 Visuals can represent more complex abstract concepts. Steps can be 5-8. \
                 Quiz should test understanding of concepts."
            }
        }
    }
}

const TODDLER_TOPICS: [&str; 6] = [
    "Big Red Ball",
    "Counting to 5",
    "Farm Animals",
    "Colors of the Rainbow",
    "Shapes around us",
    "Day and Night",
];

const CHILD_TOPICS: [&str; 6] = [
    "Planets of the Solar System",
    "Dinosaurs and Fossils",
    "How Plants Grow",
    "Simple Machines",
    "Water Cycle",
    "Healthy Foods vs Treats",
];

const PRETEEN_TOPICS: [&str; 6] = [
    "Photosynthesis",
    "Ancient Pyramids",
    "Structure of an Atom",
    "Volcano Eruption",
    "Human Skeleton",
    "Renewable Energy",
];

/// Starter topics shown on the home screen for a learner age
pub fn suggested_topics(age: u8) -> &'static [&'static str] {
    if age <= 5 {
        &TODDLER_TOPICS
    } else if age >= 10 {
        &PRETEEN_TOPICS
    } else {
        &CHILD_TOPICS
    }
}

/// Reject ages outside the supported learner range
pub fn validate_age(age: u8) -> Result<u8> {
    if (MIN_AGE..=MAX_AGE).contains(&age) {
        Ok(age)
    } else {
        Err(Error::invalid_input(format!(
            "age must be between {MIN_AGE} and {MAX_AGE}, got {age}"
        )))
    }
}

/// Trim a topic and reject it when nothing is left
pub fn normalize_topic(topic: &str) -> Result<String> {
    let trimmed = topic.trim();
    if trimmed.is_empty() {
        Err(Error::invalid_input("topic is required"))
    } else {
        Ok(trimmed.to_string())
    }
}
