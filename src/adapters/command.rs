//! Subprocess content generator.
//!
//! Pipes the prompt to an external command (any LLM CLI that reads a prompt
//! on stdin and prints the completion) and parses its stdout as a record
//! list.

use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info};

use super::response::parse_raw_response;
use super::ContentGenerator;

/// Generator backed by an external command
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    /// Program to run
    program: String,

    /// Arguments passed before the prompt is written to stdin
    args: Vec<String>,

    /// How long to wait for the command to finish
    timeout: Duration,
}

impl CommandGenerator {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    /// Run the command with `prompt` on stdin and return its stdout
    async fn run(&self, prompt: &str) -> Result<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to spawn generator '{}'", self.program))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(prompt.as_bytes())
                .await
                .context("Failed to write prompt to generator stdin")?;
            // Drop stdin to signal EOF
        }

        let output = timeout(self.timeout, child.wait_with_output())
            .await
            .with_context(|| {
                format!(
                    "Generator '{}' timed out after {:?}",
                    self.program, self.timeout
                )
            })?
            .with_context(|| format!("Failed to wait for generator '{}'", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let exit_code = output.status.code().unwrap_or(-1);
            anyhow::bail!(
                "Generator '{}' failed with exit code {}: {}",
                self.program,
                exit_code,
                stderr.trim()
            );
        }

        String::from_utf8(output.stdout).context("Generator output is not valid UTF-8")
    }
}

#[async_trait]
impl ContentGenerator for CommandGenerator {
    fn name(&self) -> &str {
        &self.program
    }

    async fn generate(&self, prompt: &str) -> Result<Vec<Value>> {
        let content = self.run(prompt).await?;
        debug!(
            preview = %content.chars().take(500).collect::<String>(),
            "Raw generator content received"
        );

        let items = parse_raw_response(&content)
            .with_context(|| format!("Invalid response from generator '{}'", self.program))?;
        info!(generator = %self.program, items = items.len(), "Content generated");

        Ok(items)
    }
}
