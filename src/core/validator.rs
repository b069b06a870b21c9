//! Structural validation of generated content.
//!
//! Every raw record is checked against its content type's schema before any
//! artifact is built. The first violation aborts the whole batch; there is
//! no partial success.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::content::{BLANK_MARKER, DEFAULT_SPEAKER_NOTES};
use crate::domain::{ContentItem, ContentType, ValidatedContentSet};

/// Raw content failed its schema.
///
/// Indices are 1-based. The offending record is kept so callers can show it
/// verbatim.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContentValidationError {
    #[error("Received empty content data list")]
    Empty,

    #[error("Item {index} is not an object")]
    NotAnObject { index: usize, item: Value },

    #[error("Item {index}: {reason}")]
    InvalidItem {
        index: usize,
        reason: String,
        item: Value,
    },
}

impl ContentValidationError {
    /// 1-based index of the failing item (None for an empty list)
    pub fn index(&self) -> Option<usize> {
        match self {
            ContentValidationError::Empty => None,
            ContentValidationError::NotAnObject { index, .. }
            | ContentValidationError::InvalidItem { index, .. } => Some(*index),
        }
    }

    /// The raw record that failed
    pub fn item(&self) -> Option<&Value> {
        match self {
            ContentValidationError::Empty => None,
            ContentValidationError::NotAnObject { item, .. }
            | ContentValidationError::InvalidItem { item, .. } => Some(item),
        }
    }
}

/// Validate raw records against `content_type`'s schema
pub fn validate(
    items: &[Value],
    content_type: ContentType,
) -> Result<ValidatedContentSet, ContentValidationError> {
    if items.is_empty() {
        return Err(ContentValidationError::Empty);
    }

    let mut validated = Vec::with_capacity(items.len());

    for (i, raw) in items.iter().enumerate() {
        let index = i + 1;
        let Some(record) = raw.as_object() else {
            return Err(ContentValidationError::NotAnObject {
                index,
                item: raw.clone(),
            });
        };

        let item = match content_type {
            ContentType::MultipleChoice => multiple_choice(record),
            ContentType::FillInBlanks => fill_in_blank(record),
            ContentType::TrueFalse => true_false(record),
            ContentType::Text => text_slide(record),
        }
        .map_err(|reason| ContentValidationError::InvalidItem {
            index,
            reason,
            item: raw.clone(),
        })?;

        validated.push(item);
    }

    Ok(ValidatedContentSet::new(content_type, validated))
}

/// Non-empty string field, if present
fn non_empty_str<'a>(record: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    record
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn required_str(record: &Map<String, Value>, key: &str) -> Result<String, String> {
    non_empty_str(record, key)
        .map(str::to_string)
        .ok_or_else(|| format!("Missing or invalid '{}' (string expected).", key))
}

fn multiple_choice(record: &Map<String, Value>) -> Result<ContentItem, String> {
    let question = required_str(record, "question")?;

    let options = match record.get("options").and_then(Value::as_array) {
        Some(options) if !options.is_empty() => options,
        _ => return Err("Missing or invalid 'options' (non-empty list expected).".to_string()),
    };
    let options: Vec<String> = options
        .iter()
        .map(|opt| opt.as_str().map(str::to_string))
        .collect::<Option<_>>()
        .ok_or_else(|| "Not all 'options' are strings.".to_string())?;

    let correct = non_empty_str(record, "correct")
        .map(str::to_string)
        .ok_or_else(|| "Missing or invalid 'correct' answer (string expected).".to_string())?;

    if !options.contains(&correct) {
        return Err(format!(
            "Correct answer '{}' not found in options.",
            correct
        ));
    }

    Ok(ContentItem::MultipleChoice {
        question,
        options,
        correct,
    })
}

fn fill_in_blank(record: &Map<String, Value>) -> Result<ContentItem, String> {
    let text = required_str(record, "text")?;
    if !text.contains(BLANK_MARKER) {
        return Err(format!("Text must contain '{}' for the blank.", BLANK_MARKER));
    }
    let answer = required_str(record, "answer")?;

    Ok(ContentItem::FillInBlank { text, answer })
}

fn true_false(record: &Map<String, Value>) -> Result<ContentItem, String> {
    let question = required_str(record, "question")?;

    let correct = match record.get("correct") {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => match s.to_lowercase().as_str() {
            "true" => true,
            "false" => false,
            _ => {
                return Err(format!(
                    "Invalid string value for 'correct' ('{}'). Use 'true' or 'false'.",
                    s
                ))
            }
        },
        _ => {
            return Err(
                "Missing or invalid 'correct' value (boolean or string 'true'/'false' expected)."
                    .to_string(),
            )
        }
    };

    Ok(ContentItem::TrueFalse { question, correct })
}

fn text_slide(record: &Map<String, Value>) -> Result<ContentItem, String> {
    let text = non_empty_str(record, "text")
        .or_else(|| non_empty_str(record, "outline"))
        .map(str::to_string)
        .ok_or_else(|| "Missing or invalid 'text' or 'outline' (string expected).".to_string())?;

    let notes = record
        .get("notes")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_SPEAKER_NOTES)
        .to_string();

    Ok(ContentItem::TextSlide { text, notes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reason(result: Result<ValidatedContentSet, ContentValidationError>) -> String {
        match result {
            Err(ContentValidationError::InvalidItem { reason, .. }) => reason,
            other => panic!("Expected InvalidItem, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_list_rejected() {
        for content_type in ContentType::ALL {
            assert_eq!(validate(&[], content_type), Err(ContentValidationError::Empty));
        }
    }

    #[test]
    fn test_non_object_rejected() {
        let items = vec![json!({"text": "ok"}), json!("just a string")];
        let err = validate(&items, ContentType::Text).unwrap_err();

        assert!(matches!(err, ContentValidationError::NotAnObject { index: 2, .. }));
        assert_eq!(err.to_string(), "Item 2 is not an object");
    }

    #[test]
    fn test_multiple_choice_valid() {
        let items = vec![json!({"question": "Q1", "options": ["A", "B"], "correct": "B"})];
        let set = validate(&items, ContentType::MultipleChoice).unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(
            set.items()[0],
            ContentItem::MultipleChoice {
                question: "Q1".to_string(),
                options: vec!["A".to_string(), "B".to_string()],
                correct: "B".to_string(),
            }
        );
    }

    #[test]
    fn test_multiple_choice_correct_must_be_an_option() {
        let items = vec![json!({"question": "Q1", "options": ["A", "B"], "correct": "C"})];
        let err = validate(&items, ContentType::MultipleChoice).unwrap_err();

        assert_eq!(err.index(), Some(1));
        assert_eq!(err.item(), Some(&items[0]));
        assert!(err.to_string().contains("'C' not found in options"));
    }

    #[test]
    fn test_multiple_choice_membership_is_case_sensitive() {
        let items = vec![json!({"question": "Q", "options": ["Paris"], "correct": "paris"})];
        assert!(validate(&items, ContentType::MultipleChoice).is_err());
    }

    #[test]
    fn test_multiple_choice_field_checks() {
        let cases = [
            (json!({"options": ["A"], "correct": "A"}), "'question'"),
            (json!({"question": "", "options": ["A"], "correct": "A"}), "'question'"),
            (json!({"question": "Q", "options": [], "correct": "A"}), "'options'"),
            (json!({"question": "Q", "options": "A", "correct": "A"}), "'options'"),
            (json!({"question": "Q", "options": ["A", 2], "correct": "A"}), "are strings"),
            (json!({"question": "Q", "options": ["A"]}), "'correct'"),
            (json!({"question": "Q", "options": ["A"], "correct": ""}), "'correct'"),
        ];

        for (item, expected) in cases {
            let msg = reason(validate(&[item.clone()], ContentType::MultipleChoice));
            assert!(msg.contains(expected), "{} should mention {}: {}", item, expected, msg);
        }
    }

    #[test]
    fn test_first_failing_item_wins() {
        let items = vec![
            json!({"question": "Q1", "options": ["A"], "correct": "A"}),
            json!({"question": "Q2", "options": ["A"], "correct": "Z"}),
            json!({"question": "", "options": [], "correct": ""}),
        ];
        let err = validate(&items, ContentType::MultipleChoice).unwrap_err();
        assert_eq!(err.index(), Some(2));
    }

    #[test]
    fn test_fill_in_blank_requires_marker() {
        let ok = vec![json!({"text": "Paris is the ____ of France.", "answer": "capital"})];
        assert!(validate(&ok, ContentType::FillInBlanks).is_ok());

        let no_marker = vec![json!({"text": "Paris is the capital.", "answer": "capital"})];
        assert!(reason(validate(&no_marker, ContentType::FillInBlanks)).contains("'____'"));

        let no_answer = vec![json!({"text": "A ____ B"})];
        assert!(reason(validate(&no_answer, ContentType::FillInBlanks)).contains("'answer'"));
    }

    #[test]
    fn test_true_false_accepts_bool_and_string_forms() {
        let items = vec![
            json!({"question": "Q1", "correct": true}),
            json!({"question": "Q2", "correct": "FALSE"}),
            json!({"question": "Q3", "correct": "True"}),
        ];
        let set = validate(&items, ContentType::TrueFalse).unwrap();
        let values: Vec<bool> = set
            .items()
            .iter()
            .map(|item| match item {
                ContentItem::TrueFalse { correct, .. } => *correct,
                other => panic!("Unexpected item: {:?}", other),
            })
            .collect();

        assert_eq!(values, vec![true, false, true]);
    }

    #[test]
    fn test_true_false_rejects_other_values() {
        let yes = vec![json!({"question": "Q", "correct": "yes"})];
        assert!(reason(validate(&yes, ContentType::TrueFalse)).contains("('yes')"));

        let number = vec![json!({"question": "Q", "correct": 1})];
        assert!(reason(validate(&number, ContentType::TrueFalse)).contains("boolean"));
    }

    #[test]
    fn test_text_slide_outline_fallback_and_default_notes() {
        let items = vec![
            json!({"outline": "Key point", "notes": "Say this"}),
            json!({"text": "Main", "outline": "ignored"}),
        ];
        let set = validate(&items, ContentType::Text).unwrap();

        assert_eq!(
            set.items()[0],
            ContentItem::TextSlide {
                text: "Key point".to_string(),
                notes: "Say this".to_string(),
            }
        );
        assert_eq!(
            set.items()[1],
            ContentItem::TextSlide {
                text: "Main".to_string(),
                notes: DEFAULT_SPEAKER_NOTES.to_string(),
            }
        );

        let neither = vec![json!({"notes": "only notes"})];
        assert!(reason(validate(&neither, ContentType::Text)).contains("'outline'"));
    }
}
