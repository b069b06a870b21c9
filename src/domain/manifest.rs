//! Package manifest (`h5p.json`) and declared library dependencies.

use serde::{Deserialize, Serialize};

/// A library the package declares it needs.
///
/// The minor version is the ideal one; resolution may pick a different minor
/// version that is actually present on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub machine_name: String,
    pub major_version: u32,
    pub minor_version: u32,
}

impl Dependency {
    pub fn new(machine_name: impl Into<String>, major_version: u32, minor_version: u32) -> Self {
        Self {
            machine_name: machine_name.into(),
            major_version,
            minor_version,
        }
    }

    /// Reference used by slide actions, e.g. `H5P.MultiChoice 1.16`
    pub fn library_ref(&self) -> String {
        format!(
            "{} {}.{}",
            self.machine_name, self.major_version, self.minor_version
        )
    }
}

impl std::fmt::Display for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} v{}", self.machine_name, self.major_version)
    }
}

/// Top-level package descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub title: String,
    pub main_library: String,
    pub language: String,
    pub embed_types: Vec<String>,
    pub preloaded_dependencies: Vec<Dependency>,
}
