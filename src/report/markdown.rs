//! Markdown transcript of the generated questions.
//!
//! Unlike the slide model, the transcript is never padded: it lists at most
//! `num_slides` validated items and nothing else.

use std::path::{Path, PathBuf};

use crate::domain::{ContentItem, ValidatedContentSet};

/// Suffix replacing the package extension in the transcript file name
pub const TRANSCRIPT_SUFFIX: &str = "_Questions.md";

/// Render the transcript
pub fn render(validated: &ValidatedContentSet, num_slides: usize) -> String {
    let mut md = format!("# {} Questions and Answers\n\n", validated.content_type());

    for (i, item) in validated.items().iter().take(num_slides).enumerate() {
        render_item(&mut md, item, i + 1);
    }

    md
}

fn render_item(md: &mut String, item: &ContentItem, number: usize) {
    match item {
        ContentItem::MultipleChoice {
            question,
            options,
            correct,
        } => {
            md.push_str(&format!("## Question {}: {}\n", number, question));
            md.push_str("Options:\n");
            for (j, opt) in options.iter().enumerate() {
                let marker = if opt == correct { "*" } else { "-" };
                md.push_str(&format!("  {} {}. {}\n", marker, j + 1, opt));
            }
            md.push_str(&format!("**Correct Answer**: {}\n\n", correct));
        }
        ContentItem::FillInBlank { text, answer } => {
            md.push_str(&format!("## Sentence {}: {}\n", number, text));
            md.push_str(&format!("**Answer**: {}\n\n", answer));
        }
        ContentItem::TrueFalse { question, correct } => {
            let answer = if *correct { "True" } else { "False" };
            md.push_str(&format!("## Statement {}: {}\n", number, question));
            md.push_str(&format!("**Answer**: {}\n\n", answer));
        }
        ContentItem::TextSlide { text, notes } => {
            md.push_str(&format!("## Slide {}: {}\n", number, text));
            md.push_str(&format!("**Speaker Notes**: {}\n\n", notes));
        }
    }
}

/// Transcript path for a package: same directory and base name, fixed suffix
pub fn transcript_path(package_path: &Path) -> PathBuf {
    let stem = package_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    package_path.with_file_name(format!("{}{}", stem, TRANSCRIPT_SUFFIX))
}

/// Render and write the transcript to `path`
pub fn write_transcript(
    validated: &ValidatedContentSet,
    num_slides: usize,
    path: &Path,
) -> std::io::Result<PathBuf> {
    std::fs::write(path, render(validated, num_slides))?;
    Ok(path.to_path_buf())
}
