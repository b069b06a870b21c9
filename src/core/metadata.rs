//! Package manifest resolution.
//!
//! The presentation shell always loads the same libraries, so the manifest
//! depends only on the title.

use crate::domain::{ContentType, Dependency, Manifest};

/// Presentation engine every package runs in
pub const MAIN_LIBRARY: &str = "H5P.CoursePresentation";

/// Declared libraries, in load order: (machine name, major, minor)
pub const DECLARED_LIBRARIES: [(&str, u32, u32); 9] = [
    (MAIN_LIBRARY, 1, 26),
    ("H5P.MultiChoice", 1, 16),
    ("H5P.Blanks", 1, 14),
    ("H5P.TrueFalse", 1, 8),
    ("H5P.AdvancedText", 1, 1),
    ("H5P.Question", 1, 5),
    ("H5P.JoubelUI", 1, 3),
    ("H5P.Transition", 1, 0),
    ("H5P.FontIcons", 1, 0),
];

/// Build the manifest for a package.
///
/// The content type does not change the dependency list; it is accepted so
/// callers describe the package the same way they describe the build.
pub fn resolve_manifest(title: &str, _content_type: ContentType) -> Manifest {
    Manifest {
        title: title.to_string(),
        main_library: MAIN_LIBRARY.to_string(),
        language: "en".to_string(),
        embed_types: vec!["iframe".to_string()],
        preloaded_dependencies: declared_dependencies(),
    }
}

/// All declared dependencies
pub fn declared_dependencies() -> Vec<Dependency> {
    DECLARED_LIBRARIES
        .iter()
        .map(|(name, major, minor)| Dependency::new(*name, *major, *minor))
        .collect()
}

/// Library that renders the interactive element for a content type
pub fn element_library(content_type: ContentType) -> Dependency {
    let name = match content_type {
        ContentType::MultipleChoice => "H5P.MultiChoice",
        ContentType::FillInBlanks => "H5P.Blanks",
        ContentType::TrueFalse => "H5P.TrueFalse",
        ContentType::Text => "H5P.AdvancedText",
    };

    DECLARED_LIBRARIES
        .iter()
        .find(|(machine_name, _, _)| *machine_name == name)
        .map(|(machine_name, major, minor)| Dependency::new(*machine_name, *major, *minor))
        .unwrap_or_else(|| unreachable!("{} is always declared", name))
}
