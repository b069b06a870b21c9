//! Package build operation.
//!
//! Ties the pieces together: validate → manifest → slides → content
//! descriptor → library resolution → archive → transcript. Validation runs
//! before any file is touched.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{info, instrument, warn};

use super::archive::{ArchiveAssembler, ArchiveError};
use super::descriptor::ContentDescriptor;
use super::metadata::resolve_manifest;
use super::resolver::LibraryResolver;
use super::slides;
use super::validator::{validate, ContentValidationError};
use crate::domain::{ContentType, Dependency};
use crate::report;

/// Extension of package files
pub const PACKAGE_EXTENSION: &str = "h5p";

/// Errors that abort a build
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Content validation failed: {0}")]
    Validation(#[from] ContentValidationError),

    #[error("Missing library folders: {}", format_missing(.0))]
    MissingLibraries(Vec<Dependency>),

    #[error("Failed to write package: {0}")]
    Archive(#[from] ArchiveError),

    #[error("Failed to write transcript {path}: {source}")]
    Transcript {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn format_missing(missing: &[Dependency]) -> String {
    missing
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Everything needed for one build
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// Package title
    pub title: String,

    pub content_type: ContentType,

    /// Raw records from the generation service
    pub items: Vec<Value>,

    /// Exact number of slides in the presentation
    pub num_slides: usize,

    /// Package file to write; the transcript lands next to it
    pub output_path: PathBuf,
}

/// Result of a successful build
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub package_path: PathBuf,
    pub transcript_path: PathBuf,
    pub slide_count: usize,

    /// Dependencies left out of the package because no folder matched
    pub missing_libraries: Vec<Dependency>,
}

/// Builds packages against one library repository
#[derive(Debug, Clone)]
pub struct PackageBuilder {
    resolver: LibraryResolver,
    assembler: ArchiveAssembler,
    strict_libraries: bool,
}

impl PackageBuilder {
    /// Create a builder reading libraries from `library_root` and staging under `temp_root`
    pub fn new(library_root: impl Into<PathBuf>, temp_root: impl Into<PathBuf>) -> Self {
        Self {
            resolver: LibraryResolver::new(library_root),
            assembler: ArchiveAssembler::new(temp_root),
            strict_libraries: false,
        }
    }

    /// Abort instead of warning when a declared library has no folder
    pub fn strict_libraries(mut self, strict: bool) -> Self {
        self.strict_libraries = strict;
        self
    }

    pub fn resolver(&self) -> &LibraryResolver {
        &self.resolver
    }

    /// Run a full build
    #[instrument(skip(self, request), fields(content_type = %request.content_type, num_slides = request.num_slides))]
    pub fn build(&self, request: &BuildRequest) -> Result<BuildOutput, BuildError> {
        let validated = validate(&request.items, request.content_type)?;
        info!(items = validated.len(), "Content validated");

        let manifest = resolve_manifest(&request.title, request.content_type);
        let descriptor = ContentDescriptor::new(slides::build(&validated, request.num_slides));

        let resolution = self.resolver.resolve_all(&manifest.preloaded_dependencies);
        if !resolution.is_complete() {
            if self.strict_libraries {
                return Err(BuildError::MissingLibraries(resolution.missing));
            }
            for dep in &resolution.missing {
                warn!("Could not find compatible library folder for {}", dep);
            }
        }

        let package = self.assembler.assemble(
            &manifest,
            &descriptor,
            &resolution.folders,
            &request.output_path,
        )?;

        let transcript_path = report::transcript_path(&package.path);
        if let Err(source) =
            report::write_transcript(&validated, request.num_slides, &transcript_path)
        {
            // Package and transcript are published together or not at all
            if let Err(e) = std::fs::remove_file(&package.path) {
                warn!(package = %package.path.display(), "Failed to remove package: {}", e);
            }
            return Err(BuildError::Transcript {
                path: transcript_path,
                source,
            });
        }

        info!(
            package = %package.path.display(),
            transcript = %transcript_path.display(),
            "Build completed"
        );

        Ok(BuildOutput {
            package_path: package.path,
            transcript_path,
            slide_count: descriptor.slide_count(),
            missing_libraries: resolution.missing,
        })
    }
}

/// `<base>_<content type>_Presentation.h5p`, with `/` in the type label replaced by `-`
pub fn presentation_file_name(base_name: &str, content_type: ContentType) -> String {
    format!(
        "{}_{}_Presentation.{}",
        base_name,
        content_type.file_label(),
        PACKAGE_EXTENSION
    )
}

/// Base name of an input document (file name up to the first `.`)
pub fn input_base_name(input: &Path) -> String {
    let file_name = input
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file_name.split_once('.') {
        Some((base, _)) if !base.is_empty() => base.to_string(),
        _ => file_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn is_empty_dir(path: &Path) -> bool {
        std::fs::read_dir(path).unwrap().next().is_none()
    }

    fn request(dir: &Path, items: Vec<Value>, num_slides: usize) -> BuildRequest {
        BuildRequest {
            title: "Course Presentation from notes".to_string(),
            content_type: ContentType::TrueFalse,
            items,
            num_slides,
            output_path: dir.join("notes_True-False_Presentation.h5p"),
        }
    }

    #[test]
    fn test_presentation_file_name() {
        assert_eq!(
            presentation_file_name("notes", ContentType::TrueFalse),
            "notes_True-False_Presentation.h5p"
        );
        assert_eq!(
            presentation_file_name("lecture", ContentType::FillInBlanks),
            "lecture_Fill in the Blanks_Presentation.h5p"
        );
    }

    #[test]
    fn test_input_base_name() {
        assert_eq!(input_base_name(Path::new("/docs/lecture.v2.pdf")), "lecture");
        assert_eq!(input_base_name(Path::new("notes")), "notes");
        assert_eq!(input_base_name(Path::new(".hidden")), ".hidden");
    }

    #[test]
    fn test_validation_failure_touches_nothing() {
        let temp = TempDir::new().unwrap();
        let builder = PackageBuilder::new(temp.path().join("libs"), temp.path().join("tmp"));
        let req = request(temp.path(), vec![json!({"question": "Q", "correct": "maybe"})], 3);

        let err = builder.build(&req).unwrap_err();
        assert!(matches!(err, BuildError::Validation(_)));
        assert!(!req.output_path.exists());
        assert!(!temp.path().join("tmp").exists());
    }

    #[test]
    fn test_missing_libraries_warn_by_default() {
        let temp = TempDir::new().unwrap();
        let builder = PackageBuilder::new(temp.path().join("libs"), temp.path().join("tmp"));
        let req = request(temp.path(), vec![json!({"question": "Q", "correct": true})], 3);

        let output = builder.build(&req).unwrap();
        assert_eq!(output.slide_count, 3);
        assert_eq!(output.missing_libraries.len(), 9);
        assert!(output.package_path.exists());
        assert!(output.transcript_path.exists());
    }

    #[test]
    fn test_missing_libraries_abort_in_strict_mode() {
        let temp = TempDir::new().unwrap();
        let builder = PackageBuilder::new(temp.path().join("libs"), temp.path().join("tmp"))
            .strict_libraries(true);
        let req = request(temp.path(), vec![json!({"question": "Q", "correct": true})], 3);

        match builder.build(&req) {
            Err(BuildError::MissingLibraries(missing)) => assert_eq!(missing.len(), 9),
            other => panic!("Expected MissingLibraries, got {:?}", other),
        }
        assert!(!req.output_path.exists());
    }

    #[test]
    fn test_transcript_failure_removes_package() {
        let temp = TempDir::new().unwrap();
        let builder = PackageBuilder::new(temp.path().join("libs"), temp.path().join("tmp"));
        let mut req = request(temp.path(), vec![json!({"question": "Q", "correct": true})], 2);
        req.output_path = temp.path().join("deck.h5p");
        std::fs::create_dir(temp.path().join("deck_Questions.md")).unwrap();

        match builder.build(&req) {
            Err(BuildError::Transcript { path, .. }) => {
                assert_eq!(path, temp.path().join("deck_Questions.md"))
            }
            other => panic!("Expected Transcript error, got {:?}", other),
        }
        assert!(!req.output_path.exists());
        assert!(is_empty_dir(&temp.path().join("tmp")));
    }
}
