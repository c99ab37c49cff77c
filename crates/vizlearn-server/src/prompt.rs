//! Generator prompt and structured-output schema

use serde_json::{json, Value};
use vizlearn_core::{AgeBracket, SceneTheme, Shape};

/// Number of quiz questions requested per lesson
pub const QUIZ_QUESTIONS: usize = 3;

/// Build the lesson prompt for `topic` pitched at `age`
pub fn build_prompt(topic: &str, age: u8) -> String {
    let complexity = AgeBracket::for_age(age).instructions();
    let shapes = Shape::ALL
        .iter()
        .map(|s| format!("'{}'", s.as_str()))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Create an interactive 3D visual lesson about: "{topic}".

{complexity}

Structure:
1. Define a set of 3D objects (shapes) that will be actors in the lesson.
2. Create a series of "steps" to explain the topic.
- In each step, provide an explanation text.
- In each step, you can move, rotate, scale, color, show, or hide the objects to visualize the concept.
3. Create a short quiz ({QUIZ_QUESTIONS} questions) based on the lesson.

Guidelines for 3D Objects:
- Use simple shapes: {shapes}.
- Position range: x: -5 to 5, y: -2 to 5, z: -5 to 5.
- To hide an object initially, set opacity to 0. To show it later, update opacity to 1.
- Use "objectUpdates" in steps to animate changes. For example, to show addition, move two objects closer together. To show the solar system, rotate planets around a sun.

Output strict JSON matching the schema."#
    )
}

fn string_enum(values: &[&str], nullable: bool) -> Value {
    json!({ "type": "STRING", "enum": values, "nullable": nullable })
}

fn number_array(nullable: bool) -> Value {
    json!({ "type": "ARRAY", "items": { "type": "NUMBER" }, "nullable": nullable })
}

/// `responseSchema` describing [`vizlearn_core::LessonData`]
pub fn response_schema() -> Value {
    let shapes: Vec<&str> = Shape::ALL.iter().map(Shape::as_str).collect();
    let themes: Vec<&str> = SceneTheme::ALL.iter().map(SceneTheme::as_str).collect();

    let object = json!({
        "type": "OBJECT",
        "properties": {
            "id": { "type": "STRING" },
            "shape": string_enum(&shapes, false),
            "color": { "type": "STRING" },
            "position": number_array(false),
            "rotation": number_array(false),
            "scale": number_array(false),
            "opacity": { "type": "NUMBER" },
            "label": { "type": "STRING", "nullable": true },
        },
        "required": ["id", "shape", "color", "position", "rotation", "scale", "opacity"],
    });

    let updates = json!({
        "type": "OBJECT",
        "properties": {
            "shape": string_enum(&shapes, true),
            "color": { "type": "STRING", "nullable": true },
            "position": number_array(true),
            "rotation": number_array(true),
            "scale": number_array(true),
            "opacity": { "type": "NUMBER", "nullable": true },
            "label": { "type": "STRING", "nullable": true },
        },
    });

    let step = json!({
        "type": "OBJECT",
        "properties": {
            "stepId": { "type": "STRING" },
            "explanation": { "type": "STRING" },
            "objectUpdates": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "updates": updates,
                    },
                    "required": ["id", "updates"],
                },
            },
        },
        "required": ["stepId", "explanation", "objectUpdates"],
    });

    let question = json!({
        "type": "OBJECT",
        "properties": {
            "question": { "type": "STRING" },
            "options": { "type": "ARRAY", "items": { "type": "STRING" } },
            "correctAnswerIndex": { "type": "INTEGER" },
            "explanation": { "type": "STRING" },
        },
        "required": ["question", "options", "correctAnswerIndex", "explanation"],
    });

    json!({
        "type": "OBJECT",
        "properties": {
            "topic": { "type": "STRING" },
            "theme": string_enum(&themes, false),
            "initialObjects": { "type": "ARRAY", "items": object },
            "steps": { "type": "ARRAY", "items": step },
            "quiz": { "type": "ARRAY", "items": question },
        },
        "required": ["topic", "theme", "initialObjects", "steps", "quiz"],
    })
}
