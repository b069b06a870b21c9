//! Library dependency resolution.
//!
//! A library repository is a flat directory of folders named
//! `<machineName>-<major>.<minor>`. Several minor versions of a library may
//! sit side by side; a dependency resolves to the highest minor version for
//! its major version.
//!
//! Version components are runs of decimal digits compared by value, so
//! `X-1.05` and `X-1.5` name the same version. Folders that collide on
//! (name, major, minor) are skipped with a warning; the version a dependency
//! resolves to is never picked between two directories.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::domain::Dependency;

/// A versioned library folder in the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryFolder {
    pub machine_name: String,
    pub major_version: u32,
    pub minor_version: u32,
    pub path: PathBuf,
    dir_name: String,
}

impl LibraryFolder {
    /// Parse a folder from its path; None if the name is not `<name>-<major>.<minor>`
    pub fn from_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        let (machine_name, version) = file_name.rsplit_once('-')?;
        let (major, minor) = version.split_once('.')?;

        if machine_name.is_empty() {
            return None;
        }

        Some(Self {
            machine_name: machine_name.to_string(),
            major_version: parse_component(major)?,
            minor_version: parse_component(minor)?,
            path: path.to_path_buf(),
            dir_name: file_name.to_string(),
        })
    }

    /// Directory name as found on disk, also used as its prefix inside the package
    pub fn name(&self) -> &str {
        &self.dir_name
    }

    fn version_key(&self) -> (&str, u32, u32) {
        (&self.machine_name, self.major_version, self.minor_version)
    }
}

/// Non-negative decimal integer: one or more ASCII digits
fn parse_component(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Remove every folder whose (name, major, minor) is claimed by another folder
fn drop_ambiguous(folders: Vec<LibraryFolder>) -> Vec<LibraryFolder> {
    let mut claims: HashMap<(String, u32, u32), Vec<String>> = HashMap::new();
    for folder in &folders {
        let (name, major, minor) = folder.version_key();
        claims
            .entry((name.to_string(), major, minor))
            .or_default()
            .push(folder.dir_name.clone());
    }

    folders
        .into_iter()
        .filter(|folder| {
            let (name, major, minor) = folder.version_key();
            let dirs = &claims[&(name.to_string(), major, minor)];
            if dirs.len() > 1 {
                warn!(
                    folder = %folder.dir_name,
                    "Skipping library folder: version {}.{} of {} is claimed by {}",
                    major,
                    minor,
                    name,
                    dirs.join(", ")
                );
                return false;
            }
            true
        })
        .collect()
}

/// Outcome of resolving a dependency list
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Resolved folders, deduplicated by name, in declaration order
    pub folders: Vec<LibraryFolder>,

    /// Dependencies with no compatible folder
    pub missing: Vec<Dependency>,
}

impl Resolution {
    /// Check if every dependency resolved
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Resolves declared dependencies against a read-only library repository
#[derive(Debug, Clone)]
pub struct LibraryResolver {
    root: PathBuf,
}

impl LibraryResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Repository directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All library folders in the repository, sorted by name.
    ///
    /// Entries that are not directories or do not follow the naming scheme
    /// are skipped, as are folders sharing a version with another folder.
    /// A missing repository yields an empty list.
    pub fn list(&self) -> Vec<LibraryFolder> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    root = %self.root.display(),
                    "Library repository not readable: {}", e
                );
                return Vec::new();
            }
        };

        let mut folders: Vec<LibraryFolder> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .filter_map(|path| {
                let folder = LibraryFolder::from_path(&path);
                if folder.is_none() {
                    debug!(path = %path.display(), "Skipping non-library folder");
                }
                folder
            })
            .collect();

        folders.sort_by(|a, b| a.dir_name.cmp(&b.dir_name));
        drop_ambiguous(folders)
    }

    /// Find the highest minor version of `machine_name` for `major_version`
    pub fn resolve(&self, machine_name: &str, major_version: u32) -> Option<LibraryFolder> {
        let best = self
            .list()
            .into_iter()
            .filter(|f| f.machine_name == machine_name && f.major_version == major_version)
            .max_by_key(|f| f.minor_version);

        match &best {
            Some(folder) => info!(
                "Found library folder for {} v{}: {}",
                machine_name,
                major_version,
                folder.name()
            ),
            None => warn!(
                "No compatible folder found for {} v{}",
                machine_name, major_version
            ),
        }

        best
    }

    /// Resolve every dependency, keeping each folder once
    pub fn resolve_all(&self, dependencies: &[Dependency]) -> Resolution {
        let mut resolution = Resolution::default();
        let mut seen = HashSet::new();

        for dep in dependencies {
            match self.resolve(&dep.machine_name, dep.major_version) {
                Some(folder) => {
                    if seen.insert(folder.name().to_string()) {
                        resolution.folders.push(folder);
                    }
                }
                None => resolution.missing.push(dep.clone()),
            }
        }

        resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repo(folders: &[&str]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for name in folders {
            std::fs::create_dir_all(temp.path().join(name)).unwrap();
        }
        temp
    }

    #[test]
    fn test_parse_folder_name() {
        let folder = LibraryFolder::from_path(Path::new("/libs/H5P.MultiChoice-1.16")).unwrap();
        assert_eq!(folder.machine_name, "H5P.MultiChoice");
        assert_eq!(folder.major_version, 1);
        assert_eq!(folder.minor_version, 16);
        assert_eq!(folder.name(), "H5P.MultiChoice-1.16");

        assert!(LibraryFolder::from_path(Path::new("H5P.Blanks")).is_none());
        assert!(LibraryFolder::from_path(Path::new("H5P.Blanks-1")).is_none());
        assert!(LibraryFolder::from_path(Path::new("H5P.Blanks-1.x")).is_none());
        assert!(LibraryFolder::from_path(Path::new("H5P.Blanks-1.-2")).is_none());
        assert!(LibraryFolder::from_path(Path::new("-1.2")).is_none());
    }

    #[test]
    fn test_leading_zeros_parse_by_value() {
        let folder = LibraryFolder::from_path(Path::new("X-1.05")).unwrap();
        assert_eq!(folder.minor_version, 5);
        assert_eq!(folder.name(), "X-1.05");
        assert_eq!(
            LibraryFolder::from_path(Path::new("X-01.0")).unwrap().major_version,
            1
        );
    }

    #[test]
    fn test_resolves_folder_with_leading_zero_minor() {
        let temp = repo(&["H5P.Blanks-1.05"]);
        let resolver = LibraryResolver::new(temp.path());

        let folder = resolver.resolve("H5P.Blanks", 1).unwrap();
        assert_eq!(folder.minor_version, 5);
        assert_eq!(folder.name(), "H5P.Blanks-1.05");
        assert_eq!(folder.path, temp.path().join("H5P.Blanks-1.05"));
    }

    #[test]
    fn test_folders_sharing_a_version_are_skipped() {
        let temp = repo(&["X-1.3", "X-1.5", "X-1.05"]);
        let resolver = LibraryResolver::new(temp.path());

        let names: Vec<String> = resolver.list().iter().map(|f| f.name().to_string()).collect();
        assert_eq!(names, vec!["X-1.3"]);
        assert_eq!(resolver.resolve("X", 1).unwrap().name(), "X-1.3");

        let only_duplicates = repo(&["Y-2.7", "Y-2.007"]);
        assert!(LibraryResolver::new(only_duplicates.path())
            .resolve("Y", 2)
            .is_none());
    }

    #[test]
    fn test_selects_highest_minor() {
        let temp = repo(&["X-1.2", "X-1.9", "X-1.10", "X-2.40", "Y-1.50"]);
        let resolver = LibraryResolver::new(temp.path());

        let folder = resolver.resolve("X", 1).unwrap();
        assert_eq!(folder.name(), "X-1.10");
        assert_eq!(folder.path, temp.path().join("X-1.10"));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let temp = repo(&["X-1.2", "X-1.9"]);
        let resolver = LibraryResolver::new(temp.path());

        let first = resolver.resolve("X", 1);
        let second = resolver.resolve("X", 1);
        assert_eq!(first, second);
        assert_eq!(first.unwrap().name(), "X-1.9");
    }

    #[test]
    fn test_ignores_files_and_prefix_collisions() {
        let temp = repo(&["H5P.Question-1.5", "H5P.QuestionSet-1.20"]);
        std::fs::write(temp.path().join("H5P.Question-1.9"), b"not a dir").unwrap();
        let resolver = LibraryResolver::new(temp.path());

        assert_eq!(resolver.resolve("H5P.Question", 1).unwrap().name(), "H5P.Question-1.5");
    }

    #[test]
    fn test_missing_repository_or_match() {
        let temp = repo(&["X-1.2"]);
        let resolver = LibraryResolver::new(temp.path());
        assert!(resolver.resolve("X", 2).is_none());
        assert!(resolver.resolve("Z", 1).is_none());

        let absent = LibraryResolver::new(temp.path().join("nope"));
        assert!(absent.resolve("X", 1).is_none());
        assert!(absent.list().is_empty());
    }

    #[test]
    fn test_resolve_all_dedupes_and_reports_missing() {
        let temp = repo(&["A-1.0", "B-1.3"]);
        let resolver = LibraryResolver::new(temp.path());

        let deps = vec![
            Dependency::new("A", 1, 0),
            Dependency::new("C", 1, 1),
            Dependency::new("B", 1, 2),
            Dependency::new("A", 1, 4),
        ];
        let resolution = resolver.resolve_all(&deps);

        let names: Vec<&str> = resolution.folders.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["A-1.0", "B-1.3"]);
        assert_eq!(resolution.missing, vec![Dependency::new("C", 1, 1)]);
        assert!(!resolution.is_complete());
    }
}
