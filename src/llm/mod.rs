//! Generation backend abstraction
//!
//! A backend takes a fully composed prompt and returns raw output, either
//! plain text or an already-structured JSON value. Transport failures
//! (network, auth, rate limits) are the backend's errors and propagate to
//! the pipeline caller; making sense of the output is the resolver's job.

use crate::resolver::RawOutput;
use anyhow::Result;
use async_trait::async_trait;

mod openai;
pub use openai::OpenAiBackend;

/// Unified trait for generation backends.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate raw output for a prompt.
    async fn generate(&self, prompt: &str) -> Result<RawOutput>;

    /// Get the backend name for logging.
    fn backend_name(&self) -> &'static str;
}
