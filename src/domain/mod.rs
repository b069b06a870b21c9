//! Domain types for h5pforge.
//!
//! This module contains the core data structures:
//! - Content: Content types and validated content items
//! - Slide: Positioned presentation elements
//! - Manifest: Package manifest and declared library dependencies

pub mod content;
pub mod manifest;
pub mod slide;

// Re-export commonly used types
pub use content::{ConfigurationError, ContentItem, ContentType, ValidatedContentSet};
pub use manifest::{Dependency, Manifest};
pub use slide::{Action, Position, Slide, SlideElement};
