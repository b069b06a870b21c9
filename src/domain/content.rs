//! Content types and validated content items.
//!
//! Raw records arrive from a text-generation service as untrusted JSON. Only
//! the validator turns them into [`ContentItem`]s, so everything downstream
//! can rely on the per-type schema holding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Notes used when a text slide has none of its own
pub const DEFAULT_SPEAKER_NOTES: &str = "No speaker notes provided.";

/// Marker a fill-in-the-blanks sentence must contain
pub const BLANK_MARKER: &str = "____";

/// Errors raised before any content is looked at
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Unsupported content type: {0}")]
    UnknownContentType(String),
}

/// Type of activity placed on each slide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Question with a list of options, exactly one of them correct
    MultipleChoice,

    /// Sentence with a single blank to fill in
    FillInBlanks,

    /// Statement to judge as true or false
    TrueFalse,

    /// Plain presentation slide with speaker notes
    Text,
}

impl ContentType {
    /// All supported content types, in menu order
    pub const ALL: [ContentType; 4] = [
        ContentType::MultipleChoice,
        ContentType::FillInBlanks,
        ContentType::TrueFalse,
        ContentType::Text,
    ];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ContentType::MultipleChoice => "Multiple Choice",
            ContentType::FillInBlanks => "Fill in the Blanks",
            ContentType::TrueFalse => "True/False",
            ContentType::Text => "Text",
        }
    }

    /// Label safe to embed in a file name (`/` replaced by `-`)
    pub fn file_label(&self) -> String {
        self.label().replace('/', "-")
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for ContentType {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "multiple choice" | "multiple-choice" | "multiple_choice" | "mc" => {
                Ok(ContentType::MultipleChoice)
            }
            "fill in the blanks" | "fill-in-the-blanks" | "fill_in_the_blanks" | "blanks" => {
                Ok(ContentType::FillInBlanks)
            }
            "true/false" | "true-false" | "true_false" | "tf" => Ok(ContentType::TrueFalse),
            "text" => Ok(ContentType::Text),
            _ => Err(ConfigurationError::UnknownContentType(s.to_string())),
        }
    }
}

/// A single content item that satisfies its content type's schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentItem {
    MultipleChoice {
        question: String,
        options: Vec<String>,
        correct: String,
    },
    FillInBlank {
        text: String,
        answer: String,
    },
    TrueFalse {
        question: String,
        correct: bool,
    },
    TextSlide {
        text: String,
        notes: String,
    },
}

impl ContentItem {
    /// Content type this item belongs to
    pub fn content_type(&self) -> ContentType {
        match self {
            ContentItem::MultipleChoice { .. } => ContentType::MultipleChoice,
            ContentItem::FillInBlank { .. } => ContentType::FillInBlanks,
            ContentItem::TrueFalse { .. } => ContentType::TrueFalse,
            ContentItem::TextSlide { .. } => ContentType::Text,
        }
    }

    /// Deterministic stand-in used to pad a presentation to its slide count.
    ///
    /// `number` is the 1-based slide number the placeholder will occupy.
    pub fn placeholder(content_type: ContentType, number: usize) -> Self {
        match content_type {
            ContentType::MultipleChoice => ContentItem::MultipleChoice {
                question: format!("Question {}", number),
                options: ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect(),
                correct: "A".to_string(),
            },
            ContentType::FillInBlanks => ContentItem::FillInBlank {
                text: format!("Sentence {} {}.", number, BLANK_MARKER),
                answer: "missing".to_string(),
            },
            ContentType::TrueFalse => ContentItem::TrueFalse {
                question: format!("Statement {}", number),
                correct: true,
            },
            ContentType::Text => ContentItem::TextSlide {
                text: format!("Slide {} Content", number),
                notes: "No speaker notes".to_string(),
            },
        }
    }
}

/// Ordered items of one content type, all of which passed validation.
///
/// Only the validator can construct this, so holding one is proof that
/// every item matches `content_type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedContentSet {
    content_type: ContentType,
    items: Vec<ContentItem>,
}

impl ValidatedContentSet {
    pub(crate) fn new(content_type: ContentType, items: Vec<ContentItem>) -> Self {
        debug_assert!(items.iter().all(|i| i.content_type() == content_type));
        Self {
            content_type,
            items,
        }
    }

    /// Content type shared by every item
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// Validated items in input order
    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    /// Get the number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_from_str() {
        assert_eq!(
            "Multiple Choice".parse::<ContentType>().unwrap(),
            ContentType::MultipleChoice
        );
        assert_eq!("mc".parse::<ContentType>().unwrap(), ContentType::MultipleChoice);
        assert_eq!(
            "fill-in-the-blanks".parse::<ContentType>().unwrap(),
            ContentType::FillInBlanks
        );
        assert_eq!("True/False".parse::<ContentType>().unwrap(), ContentType::TrueFalse);
        assert_eq!("TEXT".parse::<ContentType>().unwrap(), ContentType::Text);

        let err = "Essay".parse::<ContentType>().unwrap_err();
        assert_eq!(err, ConfigurationError::UnknownContentType("Essay".to_string()));
    }

    #[test]
    fn test_labels_round_trip() {
        for content_type in ContentType::ALL {
            assert_eq!(content_type.label().parse::<ContentType>().unwrap(), content_type);
        }
    }

    #[test]
    fn test_file_label_replaces_slash() {
        assert_eq!(ContentType::TrueFalse.file_label(), "True-False");
        assert_eq!(ContentType::MultipleChoice.file_label(), "Multiple Choice");
    }

    #[test]
    fn test_placeholders_match_their_type() {
        for content_type in ContentType::ALL {
            assert_eq!(ContentItem::placeholder(content_type, 3).content_type(), content_type);
        }

        match ContentItem::placeholder(ContentType::FillInBlanks, 2) {
            ContentItem::FillInBlank { text, answer } => {
                assert_eq!(text, "Sentence 2 ____.");
                assert_eq!(answer, "missing");
            }
            other => panic!("Unexpected placeholder: {:?}", other),
        }
    }
}
