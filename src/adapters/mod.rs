//! Adapter interfaces for external systems.
//!
//! Content generation happens outside this crate. Adapters hand back the raw
//! record list; the core never needs to know which one produced it.

pub mod command;
pub mod response;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

pub use command::CommandGenerator;
pub use response::{parse_raw_response, ResponseError};

/// Trait for text-generation backends
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Human-readable generator name
    fn name(&self) -> &str;

    /// Send a prompt and return the raw records from the response
    async fn generate(&self, prompt: &str) -> Result<Vec<Value>>;
}
