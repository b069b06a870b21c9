//! Configuration for h5pforge.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (H5PFORGE_HOME, H5PFORGE_LIBRARIES)
//! 2. Config file (.h5pforge/config.yaml)
//! 3. Defaults (~/.h5pforge)
//!
//! Config file discovery:
//! - Searches current directory and parents for .h5pforge/config.yaml
//! - Paths in config file are relative to the project root (the directory
//!   containing .h5pforge/)

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

const CONFIG_DIR: &str = ".h5pforge";
const CONFIG_FILE: &str = "config.yaml";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub build: Option<BuildConfig>,
    #[serde(default)]
    pub generator: Option<GeneratorConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory (templates database, temp files)
    pub home: Option<String>,
    /// Library repository with `<machineName>-<major>.<minor>` folders
    pub libraries: Option<String>,
    /// Root for scoped build workspaces
    pub temp: Option<String>,
    /// Prompt template database
    pub templates_db: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    pub num_slides: Option<usize>,
    pub strict_libraries: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    pub timeout_seconds: Option<u64>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// State directory
    pub home: PathBuf,
    /// Library repository
    pub libraries: PathBuf,
    /// Workspace root
    pub temp_dir: PathBuf,
    /// Prompt template database
    pub templates_db: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Build settings
    pub build: BuildSettings,
    /// Content generator settings
    pub generator: GeneratorSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    pub num_slides: usize,
    /// Abort when a declared library has no folder
    pub strict_libraries: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            num_slides: 10,
            strict_libraries: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSettings {
    /// Command that reads a prompt on stdin and prints the completion
    pub command: String,
    pub args: Vec<String>,
    pub timeout_seconds: u64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            command: "llm".to_string(),
            args: Vec::new(),
            timeout_seconds: 300,
        }
    }
}

/// Environment overrides
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub home: Option<PathBuf>,
    pub libraries: Option<PathBuf>,
}

impl EnvOverrides {
    /// Read H5PFORGE_HOME and H5PFORGE_LIBRARIES
    pub fn from_env() -> Self {
        Self {
            home: std::env::var("H5PFORGE_HOME").ok().map(PathBuf::from),
            libraries: std::env::var("H5PFORGE_LIBRARIES").ok().map(PathBuf::from),
        }
    }
}

/// Find config file by searching `start` and its parents
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_DIR).join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to `base`
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// `~/.h5pforge`, only consulted when nothing else names a home
fn default_home() -> Result<PathBuf> {
    Ok(dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(CONFIG_DIR))
}

/// Build the resolved configuration from an optional config file and env overrides
pub fn resolve(config_file: Option<PathBuf>, env: EnvOverrides) -> Result<ResolvedConfig> {
    let parsed = match &config_file {
        Some(path) => Some(load_config_file(path)?),
        None => None,
    };

    // Project root is the parent of .h5pforge/ (i.e., grandparent of config.yaml)
    let base_dir = config_file
        .as_deref()
        .and_then(|p| p.parent())
        .and_then(|p| p.parent())
        .unwrap_or(Path::new("."))
        .to_path_buf();

    let paths = parsed.as_ref().map(|c| c.paths.clone()).unwrap_or_default();
    let resolve_configured =
        |value: &Option<String>| value.as_deref().map(|p| resolve_path(&base_dir, p));

    let home = match env.home.or_else(|| resolve_configured(&paths.home)) {
        Some(home) => home,
        None => default_home()?,
    };

    let libraries = env
        .libraries
        .or_else(|| resolve_configured(&paths.libraries))
        .unwrap_or_else(|| home.join("content_types"));

    let temp_dir = resolve_configured(&paths.temp).unwrap_or_else(|| home.join("temp"));

    let templates_db = resolve_configured(&paths.templates_db)
        .unwrap_or_else(|| home.join("prompt_frameworks.db"));

    let build_defaults = BuildSettings::default();
    let build = parsed.as_ref().and_then(|c| c.build.as_ref());
    let build = BuildSettings {
        num_slides: build
            .and_then(|b| b.num_slides)
            .unwrap_or(build_defaults.num_slides),
        strict_libraries: build
            .and_then(|b| b.strict_libraries)
            .unwrap_or(build_defaults.strict_libraries),
    };

    let generator_defaults = GeneratorSettings::default();
    let generator = match parsed.as_ref().and_then(|c| c.generator.clone()) {
        Some(g) => GeneratorSettings {
            command: g.command.unwrap_or(generator_defaults.command),
            args: g.args,
            timeout_seconds: g.timeout_seconds.unwrap_or(generator_defaults.timeout_seconds),
        },
        None => generator_defaults,
    };

    Ok(ResolvedConfig {
        home,
        libraries,
        temp_dir,
        templates_db,
        config_file,
        build,
        generator,
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let config_file = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_config_file(&cwd));
    resolve(config_file, EnvOverrides::from_env())
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}
