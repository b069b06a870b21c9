//! Core package builder.
//!
//! This module contains:
//! - Validator: Structural checks on raw generated content
//! - Slides: Slide model construction with padding/truncation
//! - Descriptor: The `content.json` payload
//! - Metadata: The `h5p.json` manifest
//! - Resolver: Library dependency resolution
//! - Archive: Package assembly in a scoped workspace
//! - Builder: The end-to-end build operation

pub mod archive;
pub mod builder;
pub mod descriptor;
pub mod metadata;
pub mod resolver;
pub mod slides;
pub mod validator;

// Re-export commonly used types
pub use archive::{ArchiveAssembler, ArchiveError, AssembledPackage, Workspace};
pub use builder::{
    input_base_name, presentation_file_name, BuildError, BuildOutput, BuildRequest, PackageBuilder,
};
pub use descriptor::ContentDescriptor;
pub use metadata::{declared_dependencies, resolve_manifest};
pub use resolver::{LibraryFolder, LibraryResolver, Resolution};
pub use validator::{validate, ContentValidationError};
