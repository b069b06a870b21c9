//! Command-line interface for h5pforge.
//!
//! Provides commands for building packages from content records, validating
//! records, generating content from a text document, inspecting the library
//! repository, and managing prompt templates.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::adapters::{parse_raw_response, CommandGenerator, ContentGenerator};
use crate::config::{self, ResolvedConfig};
use crate::core::{
    declared_dependencies, input_base_name, presentation_file_name, validate, BuildError,
    BuildOutput, BuildRequest, PackageBuilder,
};
use crate::domain::ContentType;
use crate::templates::{compose_prompt, TemplateStore, DEFAULT_PROMPT};

/// h5pforge - Build H5P course presentations from generated content
#[derive(Parser, Debug)]
#[command(name = "h5pforge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a package from a JSON list of content records
    Build {
        /// JSON file with the records (a fenced LLM response is accepted)
        input: PathBuf,

        /// Content type (e.g. "Multiple Choice", mc, blanks, tf, text)
        #[arg(short = 't', long = "type")]
        content_type: ContentType,

        /// Package title
        #[arg(long)]
        title: Option<String>,

        /// Output package path (derived from the input name if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of slides (defaults to the configured value)
        #[arg(short = 'n', long)]
        num_slides: Option<usize>,

        /// Abort when a declared library has no folder
        #[arg(long)]
        strict: bool,
    },

    /// Validate content records without building
    Validate {
        /// JSON file with the records
        input: PathBuf,

        /// Content type to validate against
        #[arg(short = 't', long = "type")]
        content_type: ContentType,
    },

    /// Generate content from a text document and build a package
    Generate {
        /// Plain text source document
        input: PathBuf,

        /// Content type to generate
        #[arg(short = 't', long = "type")]
        content_type: ContentType,

        /// Prompt template name
        #[arg(long)]
        template: Option<String>,

        /// Number of slides (defaults to the configured value)
        #[arg(short = 'n', long)]
        num_slides: Option<usize>,

        /// Directory for the package and transcript (defaults to the input's directory)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Abort when a declared library has no folder
        #[arg(long)]
        strict: bool,
    },

    /// List library folders and how declared dependencies resolve
    Libraries,

    /// Manage prompt templates
    Templates {
        #[command(subcommand)]
        command: TemplateCommands,
    },

    /// Show resolved configuration (debug)
    Config,
}

#[derive(Subcommand, Debug)]
pub enum TemplateCommands {
    /// List template names
    List,

    /// Show a template's prompt
    Show {
        /// Template name
        name: String,
    },

    /// Add a template
    Add {
        /// Template name
        name: String,

        /// Prompt text
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        prompt: Option<String>,

        /// Read the prompt text from a file
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Delete a template
    Delete {
        /// Template name
        name: String,
    },
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Build {
                input,
                content_type,
                title,
                output,
                num_slides,
                strict,
            } => build_package(&input, content_type, title, output, num_slides, strict).await,
            Commands::Validate {
                input,
                content_type,
            } => validate_records(&input, content_type),
            Commands::Generate {
                input,
                content_type,
                template,
                num_slides,
                output_dir,
                strict,
            } => {
                generate_package(&input, content_type, template, num_slides, output_dir, strict)
                    .await
            }
            Commands::Libraries => list_libraries(),
            Commands::Templates { command } => execute_templates(command),
            Commands::Config => show_config(),
        }
    }
}

/// Read a JSON record list from a file
fn read_records(path: &Path) -> Result<Vec<Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    parse_raw_response(&content)
        .with_context(|| format!("Invalid content records in {}", path.display()))
}

/// Default title for a package built from `input`
fn default_title(input: &Path) -> String {
    format!("Course Presentation from {}", input_base_name(input))
}

/// Output path next to `input` (or in `dir`) named after the input and type
fn default_output(input: &Path, dir: Option<&Path>, content_type: ContentType) -> PathBuf {
    let dir = dir
        .or_else(|| input.parent())
        .unwrap_or_else(|| Path::new("."));
    dir.join(presentation_file_name(&input_base_name(input), content_type))
}

fn package_builder(cfg: &ResolvedConfig, strict: bool) -> PackageBuilder {
    PackageBuilder::new(&cfg.libraries, &cfg.temp_dir)
        .strict_libraries(strict || cfg.build.strict_libraries)
}

/// Run a build off the async runtime and report the outcome
async fn run_build(builder: PackageBuilder, request: BuildRequest) -> Result<BuildOutput> {
    let result = tokio::task::spawn_blocking(move || builder.build(&request))
        .await
        .context("Build task panicked")?;

    match result {
        Ok(output) => Ok(output),
        Err(BuildError::Validation(err)) => {
            report_validation_error(&err);
            std::process::exit(1);
        }
        Err(err) => Err(err.into()),
    }
}

fn report_validation_error(err: &crate::core::ContentValidationError) {
    eprintln!("Error: {}", err);
    if let Some(item) = err.item() {
        let pretty = serde_json::to_string_pretty(item).unwrap_or_else(|_| item.to_string());
        eprintln!("Offending item:\n{}", pretty);
    }
}

fn print_build_output(output: &BuildOutput) {
    eprintln!("\nPackage built successfully!");
    eprintln!("   Package:    {}", output.package_path.display());
    eprintln!("   Transcript: {}", output.transcript_path.display());
    eprintln!("   Slides:     {}", output.slide_count);
    if !output.missing_libraries.is_empty() {
        let missing: Vec<String> = output
            .missing_libraries
            .iter()
            .map(|d| d.to_string())
            .collect();
        eprintln!("   Missing libraries: {}", missing.join(", "));
    }
}

/// Build a package from a record file
async fn build_package(
    input: &Path,
    content_type: ContentType,
    title: Option<String>,
    output: Option<PathBuf>,
    num_slides: Option<usize>,
    strict: bool,
) -> Result<()> {
    let cfg = config::config()?;
    let items = read_records(input)?;

    let request = BuildRequest {
        title: title.unwrap_or_else(|| default_title(input)),
        content_type,
        items,
        num_slides: num_slides.unwrap_or(cfg.build.num_slides),
        output_path: output.unwrap_or_else(|| default_output(input, None, content_type)),
    };

    let output = run_build(package_builder(cfg, strict), request).await?;
    print_build_output(&output);
    Ok(())
}

/// Validate a record file
fn validate_records(input: &Path, content_type: ContentType) -> Result<()> {
    let items = read_records(input)?;

    match validate(&items, content_type) {
        Ok(validated) => {
            println!(
                "{} valid {} item(s)",
                validated.len(),
                content_type.label()
            );
            Ok(())
        }
        Err(err) => {
            report_validation_error(&err);
            std::process::exit(1);
        }
    }
}

/// Generate records from a document, then build
async fn generate_package(
    input: &Path,
    content_type: ContentType,
    template: Option<String>,
    num_slides: Option<usize>,
    output_dir: Option<PathBuf>,
    strict: bool,
) -> Result<()> {
    let cfg = config::config()?;
    let num_slides = num_slides.unwrap_or(cfg.build.num_slides);

    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    if text.trim().is_empty() {
        anyhow::bail!("Input is empty: {}", input.display());
    }

    let base = match &template {
        Some(name) => {
            let store = TemplateStore::open(&cfg.templates_db)?;
            store
                .get(name)?
                .ok_or_else(|| anyhow::anyhow!("Template not found: {}", name))?
        }
        None => DEFAULT_PROMPT.to_string(),
    };
    let prompt = compose_prompt(&base, content_type, num_slides, &text);

    let generator = CommandGenerator::new(
        &cfg.generator.command,
        cfg.generator.args.clone(),
        Duration::from_secs(cfg.generator.timeout_seconds),
    );
    eprintln!(
        "Generating {} content with '{}'...",
        content_type,
        generator.name()
    );
    let items = generator.generate(&prompt).await?;

    let request = BuildRequest {
        title: default_title(input),
        content_type,
        items,
        num_slides,
        output_path: default_output(input, output_dir.as_deref(), content_type),
    };

    let output = run_build(package_builder(cfg, strict), request).await?;
    print_build_output(&output);
    Ok(())
}

/// List library folders and dependency resolution
fn list_libraries() -> Result<()> {
    let cfg = config::config()?;
    let builder = package_builder(cfg, false);
    let resolver = builder.resolver();

    println!("Library repository: {}", resolver.root().display());

    let folders = resolver.list();
    if folders.is_empty() {
        println!("  (no library folders found)");
    } else {
        for folder in &folders {
            println!("  {}", folder.name());
        }
    }

    println!("\nDeclared dependencies:");
    let resolution = resolver.resolve_all(&declared_dependencies());
    for folder in &resolution.folders {
        println!("  {:<28} -> {}", folder.machine_name, folder.name());
    }
    for dep in &resolution.missing {
        println!("  {:<28} -> MISSING ({})", dep.machine_name, dep);
    }

    Ok(())
}

/// Execute template subcommands
fn execute_templates(command: TemplateCommands) -> Result<()> {
    let cfg = config::config()?;
    let store = TemplateStore::open(&cfg.templates_db)
        .with_context(|| format!("Failed to open template store: {}", cfg.templates_db.display()))?;

    match command {
        TemplateCommands::List => {
            for template in store.templates()? {
                println!(
                    "{:<30} {}",
                    template.name,
                    template.created_at.format("%Y-%m-%d")
                );
            }
        }
        TemplateCommands::Show { name } => {
            let prompt = store
                .get(&name)?
                .ok_or_else(|| anyhow::anyhow!("Template not found: {}", name))?;
            println!("{}", prompt);
        }
        TemplateCommands::Add { name, prompt, file } => {
            let prompt = match (prompt, file) {
                (Some(prompt), _) => prompt,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read prompt file: {}", path.display()))?,
                (None, None) => anyhow::bail!("Provide --prompt or --file"),
            };
            store.add(&name, prompt.trim())?;
            eprintln!("Template '{}' added", name);
        }
        TemplateCommands::Delete { name } => {
            if store.delete(&name)? {
                eprintln!("Template '{}' deleted", name);
            } else {
                anyhow::bail!("Template not found: {}", name);
            }
        }
    }

    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("h5pforge Configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Home:         {}", cfg.home.display());
    println!("  Libraries:    {}", cfg.libraries.display());
    println!("  Temp:         {}", cfg.temp_dir.display());
    println!("  Templates DB: {}", cfg.templates_db.display());
    println!();
    println!("Build:");
    println!("  Slides:           {}", cfg.build.num_slides);
    println!("  Strict libraries: {}", cfg.build.strict_libraries);
    println!();
    println!("Generator:");
    println!("  Command: {}", cfg.generator.command);
    println!("  Args:    {:?}", cfg.generator.args);
    println!("  Timeout: {}s", cfg.generator.timeout_seconds);

    Ok(())
}
