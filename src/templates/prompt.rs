//! Prompt composition for content generation.

use crate::domain::ContentType;

/// Leading prompt used when no template is chosen
pub const DEFAULT_PROMPT: &str = "Generate clear, concise questions based on the provided text.";

/// Compose the full prompt sent to a generator.
///
/// The base prompt (usually a stored template) is followed by a strict JSON
/// instruction, then the per-type request that names the expected keys, then
/// the source text.
pub fn compose_prompt(
    base: &str,
    content_type: ContentType,
    num_slides: usize,
    source_text: &str,
) -> String {
    let strict_json = format!(
        "IMPORTANT: Your response MUST be ONLY the valid JSON list containing {} objects, \
         strictly formatted as requested. Do NOT include any other text, explanations, comments, \
         markdown formatting, or tags like <think> before or after the JSON data.",
        num_slides
    );

    let request = match content_type {
        ContentType::MultipleChoice => format!(
            "From the following text, generate {} multiple-choice questions, each with 4 options \
             and one correct answer. Return the result as a JSON list of objects with 'question', \
             'options', and 'correct' keys. Crucially, the value for the 'correct' key MUST be the \
             exact text of one of the strings provided in the 'options' list for that question.",
            num_slides
        ),
        ContentType::FillInBlanks => format!(
            "From the following text, generate {} fill-in-the-blanks sentences, each with one \
             blank written as '____' and its answer. Return the result as a JSON list of objects \
             with 'text' and 'answer' keys.",
            num_slides
        ),
        ContentType::TrueFalse => format!(
            "From the following text, generate {} true/false statements, each with a question \
             and a correct answer (True or False). Return the result as a JSON list of objects \
             with 'question' and 'correct' keys.",
            num_slides
        ),
        ContentType::Text => format!(
            "From the following text, generate {} concise text snippets for presentation slides, \
             each summarizing a key point. Return the result as a JSON list of objects with \
             'text' keys.",
            num_slides
        ),
    };

    format!(
        "{}\n\n{}\n\n{}\n\nText:\n{}",
        base, strict_json, request, source_text
    )
}
