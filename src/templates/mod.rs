//! Prompt templates and prompt composition.
//!
//! Templates are stored in a small SQLite database so they survive between
//! runs; the composed prompt is what gets handed to a content generator.

pub mod prompt;
pub mod store;

pub use prompt::{compose_prompt, DEFAULT_PROMPT};
pub use store::{Template, TemplateError, TemplateStore};
