//! Weekly report pipeline: aggregate the log window, then narrate it

use crate::aggregator::aggregate;
use crate::llm::GenerationBackend;
use crate::resolver::resolve;
use crate::types::{LogRow, WeeklyRecord, WindowStats};
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::sync::Arc;

/// Fixed instruction prepended to every weekly prompt.
const WEEKLY_INSTRUCTION: &str = "You are a weekly crypto market analyst. \
I will give you the last few daily AI crypto logs with prices and sentiment. \
Your job is to write a 2-3 sentence weekly summary. \
Then classify the overall weekly sentiment as Bullish, Bearish, or Neutral. \
Finally, explain briefly (1 sentence) why you chose that sentiment. \
Output ONLY valid JSON:\n\
{\n  \"summary\": \"...\",\n  \"sentiment\": \"...\",\n  \"reasoning\": \"...\"\n}";

/// Weekly report builder.
pub struct WeeklyReporter {
    backend: Arc<dyn GenerationBackend>,
    window_size: usize,
}

impl WeeklyReporter {
    pub fn new(backend: Arc<dyn GenerationBackend>, window_size: usize) -> Self {
        Self { backend, window_size }
    }

    /// Render the window rows and computed statistics into a single prompt.
    fn build_prompt(window: &[LogRow], stats: &WindowStats) -> String {
        let mut listing = String::from("Recent crypto logs (latest first):\n");
        for row in window.iter().rev() {
            let _ = writeln!(
                listing,
                "- {}: BTC={}, ETH={}, Sentiment={}, Reasoning={}",
                row.timestamp, row.btc, row.eth, row.sentiment, row.reasoning
            );
        }

        format!(
            "{WEEKLY_INSTRUCTION}\n\n\
             Here are the last {} crypto logs:\n{listing}\n\
             Stats:\n\
             - Average BTC price: ${:.2}\n\
             - Average ETH price: ${:.2}\n\
             - Sentiment counts: {}\n\n\
             Based on this, write a weekly summary.",
            window.len(),
            stats.avg_btc,
            stats.avg_eth,
            stats.sentiment_counts
        )
    }

    /// Aggregate the trailing window and generate the weekly narrative.
    ///
    /// Returns both the raw statistics and the narrative record. The
    /// narrative's sentiment is the model's own judgment over the window and
    /// is not reconciled with the majority count; callers persist both.
    pub async fn build_weekly_report(
        &self,
        rows: &[LogRow],
    ) -> Result<(WindowStats, WeeklyRecord)> {
        let stats = aggregate(rows, self.window_size);

        let start = rows.len().saturating_sub(self.window_size);
        let window = &rows[start..];

        let prompt = Self::build_prompt(window, &stats);

        let raw = self
            .backend
            .generate(&prompt)
            .await
            .context("Weekly report generation failed")?;

        tracing::debug!(
            backend = self.backend.backend_name(),
            raw = %raw.display_text(),
            "raw weekly output"
        );

        let record = resolve::<WeeklyRecord>(&raw);
        Ok((stats, record))
    }
}
