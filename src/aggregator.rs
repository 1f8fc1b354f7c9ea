//! Trailing-window aggregation over historical log rows
//!
//! The source log is external and loosely typed, so the policy is lossy by
//! design: a malformed price drops that row from one asset's average without
//! touching the other, and unrecognized sentiments are skipped. Nothing in a
//! row can abort the aggregation.

use crate::types::{LogRow, Sentiment, SentimentCounts, WindowStats};
use serde_json::Value;

/// Coerce a raw log cell to a price sample.
///
/// Numbers are taken as-is; strings are trimmed and parsed. Everything else
/// (null, booleans, nested values) yields no sample.
fn price_sample(cell: &Value) -> Option<f64> {
    match cell {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Aggregate the trailing `window_size` rows into window statistics.
///
/// If fewer rows exist than `window_size`, all of them are used. An empty
/// window yields zeroed statistics. Each asset accumulates its own sample
/// count, so a row with one malformed price still contributes to the other
/// asset's average.
pub fn aggregate(rows: &[LogRow], window_size: usize) -> WindowStats {
    let start = rows.len().saturating_sub(window_size);
    let window = &rows[start..];

    let mut btc_sum = 0.0;
    let mut btc_count = 0u32;
    let mut eth_sum = 0.0;
    let mut eth_count = 0u32;
    let mut counts = SentimentCounts::default();

    for row in window {
        if let Some(btc) = price_sample(&row.btc) {
            btc_sum += btc;
            btc_count += 1;
        }
        if let Some(eth) = price_sample(&row.eth) {
            eth_sum += eth;
            eth_count += 1;
        }

        match Sentiment::from_label(row.sentiment.trim()) {
            Some(Sentiment::Bullish) => counts.bullish += 1,
            Some(Sentiment::Bearish) => counts.bearish += 1,
            Some(Sentiment::Neutral) => counts.neutral += 1,
            _ => {}
        }
    }

    let stats = WindowStats {
        avg_btc: if btc_count > 0 { btc_sum / f64::from(btc_count) } else { 0.0 },
        avg_eth: if eth_count > 0 { eth_sum / f64::from(eth_count) } else { 0.0 },
        sentiment_counts: counts,
    };

    tracing::debug!(
        rows = window.len(),
        btc_samples = btc_count,
        eth_samples = eth_count,
        counted_sentiments = counts.total(),
        "window aggregated"
    );

    stats
}
