//! h5pforge - H5P course presentation builder
//!
//! Turns a list of generated content records (multiple choice questions,
//! fill-in-the-blank sentences, true/false statements or plain text slides)
//! into an H5P Course Presentation package plus a markdown transcript.
//!
//! # Build flow
//!
//! - Records are validated against the chosen content type before any file
//!   is written
//! - Exactly `num_slides` slides are produced, padded with placeholders
//! - Declared libraries are resolved to the highest minor version present
//!   in the library repository
//! - The package is assembled in a scoped workspace that is always removed
//!
//! # Modules
//!
//! - `domain`: Data structures (ContentType, ContentItem, Slide, Manifest)
//! - `core`: Package builder (validation, slides, resolution, archive)
//! - `report`: Markdown transcript
//! - `adapters`: Content generators
//! - `templates`: Prompt templates and prompt composition
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Build from records produced elsewhere
//! h5pforge build records.json --type "Multiple Choice"
//!
//! # Generate records from a text document, then build
//! h5pforge generate lecture.txt --type tf --template "Simple Recall"
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod report;
pub mod templates;

// Re-export main types at crate root for convenience
pub use adapters::{CommandGenerator, ContentGenerator};
pub use core::{BuildError, BuildOutput, BuildRequest, ContentValidationError, PackageBuilder};
pub use domain::{ContentItem, ContentType, ValidatedContentSet};
pub use templates::{Template, TemplateStore};
