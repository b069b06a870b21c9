//! Slides of a course presentation.
//!
//! Field names follow the layout the presentation player reads from
//! `content/content.json`.

use serde::{Deserialize, Serialize};

/// Placement of an element on its slide, in percent of the slide size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: u8,
    pub y: u8,
    pub width: u8,
    pub height: u8,
}

impl Position {
    pub const fn new(x: u8, y: u8, width: u8, height: u8) -> Self {
        Self { x, y, width, height }
    }

    /// Covers most of the slide
    pub const FULL: Position = Position::new(5, 5, 90, 90);

    /// Upper half
    pub const TOP: Position = Position::new(5, 5, 90, 40);

    /// Lower half
    pub const BOTTOM: Position = Position::new(5, 50, 90, 40);
}

/// Interactive or static content run by one library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    /// Library reference, `Name Major.Minor`
    pub library: String,
    pub params: serde_json::Value,
    pub sub_content_id: String,
}

/// A positioned action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideElement {
    #[serde(flatten)]
    pub position: Position,
    pub action: Action,
}

/// One screen of the presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub elements: Vec<SlideElement>,
    pub title: String,
    pub slide_background_selector: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_element_position_is_flattened() {
        let element = SlideElement {
            position: Position::FULL,
            action: Action {
                library: "H5P.TrueFalse 1.8".to_string(),
                params: json!({"question": "Q", "correct": true}),
                sub_content_id: "slide-1-tf-0badc0de".to_string(),
            },
        };

        let value = serde_json::to_value(&element).unwrap();
        assert_eq!(value["x"], 5);
        assert_eq!(value["height"], 90);
        assert_eq!(value["action"]["subContentId"], "slide-1-tf-0badc0de");
        assert!(value.get("position").is_none());
    }
}
