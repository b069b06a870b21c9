//! Human-readable renderings of validated content.

pub mod markdown;

pub use markdown::{render, transcript_path, write_transcript};
