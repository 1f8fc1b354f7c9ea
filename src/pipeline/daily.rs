//! Daily analysis pipeline: market facts in, validated record out

use crate::llm::GenerationBackend;
use crate::resolver::resolve;
use crate::types::AnalysisRecord;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Fixed analyst instruction prepended to every daily prompt.
const DAILY_INSTRUCTION: &str = "You are a professional crypto market analyst. \
Given Bitcoin and Ethereum prices or recent trends, summarize the market in 1-2 sentences. \
Then classify the sentiment as Bullish, Bearish, or Neutral. \
Finally, explain your reasoning briefly (1 sentence). \
Output ONLY valid JSON in this format:\n\n\
{\n  \"summary\": \"...\",\n  \"sentiment\": \"...\",\n  \"reasoning\": \"...\"\n}";

/// Daily market analyst.
///
/// Holds only a backend handle; each `analyze` call is independent.
pub struct DailyAnalyst {
    backend: Arc<dyn GenerationBackend>,
}

impl DailyAnalyst {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    fn build_prompt(facts: &str) -> String {
        format!("{DAILY_INSTRUCTION}\n\n{facts}")
    }

    /// Analyze market facts into a structured record.
    ///
    /// Transport failures from the backend propagate to the caller.
    /// Unstructured or invalid output is absorbed by the resolver into a
    /// fallback record, so a successful return is always well-typed.
    pub async fn analyze(&self, facts: &str) -> Result<AnalysisRecord> {
        let prompt = Self::build_prompt(facts);

        let raw = self
            .backend
            .generate(&prompt)
            .await
            .context("Daily analysis generation failed")?;

        tracing::debug!(
            backend = self.backend.backend_name(),
            raw = %raw.display_text(),
            "raw daily output"
        );

        Ok(resolve::<AnalysisRecord>(&raw))
    }
}
