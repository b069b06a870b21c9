//! Slide model construction.
//!
//! Turns validated items into exactly `num_slides` slides: items beyond the
//! requested count are dropped, and missing ones are filled with
//! deterministic placeholders.

use serde_json::json;
use uuid::Uuid;

use super::metadata::element_library;
use crate::domain::content::BLANK_MARKER;
use crate::domain::{Action, ContentItem, Position, Slide, SlideElement, ValidatedContentSet};

/// Build the slide sequence for a presentation
pub fn build(validated: &ValidatedContentSet, num_slides: usize) -> Vec<Slide> {
    let content_type = validated.content_type();
    let mut slides: Vec<Slide> = validated
        .items()
        .iter()
        .take(num_slides)
        .enumerate()
        .map(|(i, item)| slide_for(item, i + 1))
        .collect();

    while slides.len() < num_slides {
        let number = slides.len() + 1;
        slides.push(slide_for(&ContentItem::placeholder(content_type, number), number));
    }

    slides
}

/// Build one slide; `number` is 1-based
fn slide_for(item: &ContentItem, number: usize) -> Slide {
    let library = element_library(item.content_type()).library_ref();

    let (title, elements) = match item {
        ContentItem::MultipleChoice {
            question,
            options,
            correct,
        } => {
            let answers: Vec<_> = options
                .iter()
                .map(|opt| json!({"text": opt, "correct": opt == correct}))
                .collect();
            let params = json!({
                "question": question,
                "answers": answers,
                "behaviour": {
                    "enableRetry": true,
                    "enableSolutionsButton": true,
                    "singlePoint": false,
                    "showSolutions": true,
                },
                "l10n": {
                    "showSolutions": "Show solutions",
                    "retry": "Retry",
                },
            });
            (
                format!("Question {}", number),
                vec![element(Position::FULL, &library, params, number, "mc")],
            )
        }
        ContentItem::FillInBlank { text, answer } => {
            let params = json!({
                "text": mark_blank(text, answer),
                "behaviour": {
                    "enableRetry": true,
                    "enableSolutionsButton": true,
                    "showSolutions": true,
                },
            });
            (
                format!("Sentence {}", number),
                vec![element(Position::FULL, &library, params, number, "blanks")],
            )
        }
        ContentItem::TrueFalse { question, correct } => {
            let params = json!({
                "question": question,
                "correct": correct,
                "behaviour": {
                    "enableRetry": true,
                    "enableSolutionsButton": true,
                    "showSolutions": true,
                },
            });
            (
                format!("Statement {}", number),
                vec![element(Position::FULL, &library, params, number, "tf")],
            )
        }
        ContentItem::TextSlide { text, notes } => {
            let heading = json!({"text": format!("<h3>{}</h3>", text)});
            let annotated = json!({
                "text": format!("<p><em>Speaker Notes:</em> {}</p>", notes)
            });
            (
                format!("Slide {}", number),
                vec![
                    element(Position::TOP, &library, heading, number, "text-outline"),
                    element(Position::BOTTOM, &library, annotated, number, "text-notes"),
                ],
            )
        }
    };

    Slide {
        elements,
        title,
        slide_background_selector: json!({}),
    }
}

fn element(
    position: Position,
    library: &str,
    params: serde_json::Value,
    number: usize,
    kind: &str,
) -> SlideElement {
    SlideElement {
        position,
        action: Action {
            library: library.to_string(),
            params,
            sub_content_id: sub_content_id(number, kind),
        },
    }
}

/// `slide-<n>-<kind>-<8 hex>`; slide number and kind keep it unique within a build
fn sub_content_id(number: usize, kind: &str) -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("slide-{}-{}-{}", number, kind, &token[..8])
}

/// Replace every blank marker with the answer in the `*answer*` blank syntax
fn mark_blank(text: &str, answer: &str) -> String {
    text.replace(BLANK_MARKER, &format!("*{}*", answer))
}
