//! Historical log rows and the statistics derived from them

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One historical row from the analysis log.
///
/// The log is an external, loosely-typed source: prices may be numbers,
/// strings, or missing entirely, and sentiment is free text. Price cells are
/// kept as raw JSON values; the aggregator decides what counts as a sample.
/// The timestamp is opaque and never parsed.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LogRow {
    #[serde(rename = "Timestamp", default)]
    pub timestamp: String,
    #[serde(rename = "BTC (USD)", default)]
    pub btc: Value,
    #[serde(rename = "ETH (USD)", default)]
    pub eth: Value,
    #[serde(rename = "Sentiment", default)]
    pub sentiment: String,
    #[serde(rename = "Reasoning", default)]
    pub reasoning: String,
    #[serde(rename = "Summary", default)]
    pub summary: String,
}

/// Per-category counts over a window.
///
/// `Unknown`, empty, and malformed sentiments are never counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub bullish: u32,
    pub bearish: u32,
    pub neutral: u32,
}

impl SentimentCounts {
    pub fn total(self) -> u32 {
        self.bullish + self.bearish + self.neutral
    }
}

impl std::fmt::Display for SentimentCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{'Bullish': {}, 'Bearish': {}, 'Neutral': {}}}",
            self.bullish, self.bearish, self.neutral
        )
    }
}

/// Numeric and categorical statistics over a trailing log window.
///
/// Averages are `0.0` when the window held no valid samples for that asset;
/// an empty window is a valid zeroed result, not an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WindowStats {
    pub avg_btc: f64,
    pub avg_eth: f64,
    pub sentiment_counts: SentimentCounts,
}
