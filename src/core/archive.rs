//! Package archive assembly.
//!
//! # Package Layout
//!
//! ```text
//! <output>.h5p
//! ├── h5p.json                  # Manifest
//! ├── content/
//! │   └── content.json          # Content descriptor
//! └── <machineName>-<maj>.<min>/  # One per resolved library, mirrored
//! ```
//!
//! Serialized files are staged in a scoped workspace directory that is
//! removed when the assembler returns, whatever the outcome.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, Seek, Write};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::{SimpleFileOptions, ZipWriter};

use super::descriptor::ContentDescriptor;
use super::resolver::LibraryFolder;
use crate::domain::Manifest;

/// Archive path of the manifest
pub const MANIFEST_ENTRY: &str = "h5p.json";

/// Archive path of the content descriptor
pub const CONTENT_ENTRY: &str = "content/content.json";

/// Errors that can occur while writing a package
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Failed to read library folder: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Uniquely named staging directory owned by a single build.
///
/// Created on acquisition and recursively deleted on drop.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh workspace (with its `content/` subdirectory) under `root`
    pub fn create_in(root: &Path) -> io::Result<Self> {
        fs::create_dir_all(root)?;
        let dir = tempfile::Builder::new().prefix("h5p_").tempdir_in(root)?;
        fs::create_dir(dir.path().join("content"))?;
        debug!(workspace = %dir.path().display(), "Created workspace");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Serialize `value` as JSON at `relative` inside the workspace
    fn write_json<T: serde::Serialize>(
        &self,
        relative: &str,
        value: &T,
    ) -> Result<PathBuf, ArchiveError> {
        let path = self.path().join(relative);
        fs::write(&path, serde_json::to_vec(value)?)?;
        Ok(path)
    }
}

/// Summary of a written package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledPackage {
    pub path: PathBuf,

    /// Number of file entries in the archive
    pub entries: usize,
}

/// Writes manifest, content descriptor and libraries into one archive
#[derive(Debug, Clone)]
pub struct ArchiveAssembler {
    temp_root: PathBuf,
}

impl ArchiveAssembler {
    /// Create an assembler that stages files under `temp_root`
    pub fn new(temp_root: impl Into<PathBuf>) -> Self {
        Self {
            temp_root: temp_root.into(),
        }
    }

    /// Write the package to `output_path`.
    ///
    /// Library folders are copied once each, in the given order. Any failure
    /// is fatal; a partially written archive is removed before returning.
    pub fn assemble(
        &self,
        manifest: &Manifest,
        descriptor: &ContentDescriptor,
        folders: &[LibraryFolder],
        output_path: &Path,
    ) -> Result<AssembledPackage, ArchiveError> {
        let workspace = Workspace::create_in(&self.temp_root)?;

        let staged = [
            (MANIFEST_ENTRY, workspace.write_json(MANIFEST_ENTRY, manifest)?),
            (CONTENT_ENTRY, workspace.write_json(CONTENT_ENTRY, descriptor)?),
        ];

        let file = File::create(output_path)?;
        let entries = match write_archive(file, &staged, folders) {
            Ok(entries) => entries,
            Err(e) => {
                if let Err(remove_err) = fs::remove_file(output_path) {
                    debug!("Failed to remove partial archive: {}", remove_err);
                }
                return Err(e);
            }
        };

        info!(
            path = %output_path.display(),
            entries,
            libraries = folders.len(),
            "Package written"
        );

        Ok(AssembledPackage {
            path: output_path.to_path_buf(),
            entries,
        })
    }
}

fn write_archive<W: Write + Seek>(
    writer: W,
    staged: &[(&str, PathBuf)],
    folders: &[LibraryFolder],
) -> Result<usize, ArchiveError> {
    let mut zip = ZipWriter::new(writer);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    let mut entries = 0;

    for (name, path) in staged {
        add_file(&mut zip, name, path, options)?;
        entries += 1;
    }

    let mut copied = HashSet::new();
    for folder in folders {
        let prefix = folder.name();
        if !copied.insert(prefix) {
            continue;
        }
        entries += add_directory(&mut zip, &folder.path, prefix, options)?;
    }

    zip.finish()?;
    Ok(entries)
}

fn add_file<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    path: &Path,
    options: SimpleFileOptions,
) -> Result<(), ArchiveError> {
    zip.start_file(name, options)?;
    let mut source = File::open(path)?;
    io::copy(&mut source, zip)?;
    Ok(())
}

/// Mirror every file under `source_dir` below `prefix`; directories are implicit
fn add_directory<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    source_dir: &Path,
    prefix: &str,
    options: SimpleFileOptions,
) -> Result<usize, ArchiveError> {
    let mut count = 0;

    for entry in WalkDir::new(source_dir)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(source_dir) else {
            continue;
        };

        let mut name = prefix.to_string();
        for component in relative.components() {
            name.push('/');
            name.push_str(&component.as_os_str().to_string_lossy());
        }

        add_file(zip, &name, entry.path(), options)?;
        count += 1;
    }

    Ok(count)
}
