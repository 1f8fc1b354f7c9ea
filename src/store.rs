//! Append-only JSONL log store
//!
//! The analysis log and the weekly report log are plain JSONL files, one row
//! per line, keyed by the same column names the records carry downstream.
//! Rows are appended, never mutated or deleted; readers get the full ordered
//! history, oldest first.

use crate::config::StoreConfig;
use crate::types::{AnalysisRecord, LogRow, WeeklyRecord, WindowStats};
use serde::Serialize;
use serde_json::json;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("log I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("log row could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Weekly report row layout: aggregated statistics side by side with the
/// narrative judgment, which may disagree with the majority count.
#[derive(Debug, Serialize)]
struct WeeklyRow<'a> {
    #[serde(rename = "Date")]
    date: &'a str,
    #[serde(rename = "Avg BTC")]
    avg_btc: f64,
    #[serde(rename = "Avg ETH")]
    avg_eth: f64,
    #[serde(rename = "Bullish")]
    bullish: u32,
    #[serde(rename = "Bearish")]
    bearish: u32,
    #[serde(rename = "Neutral")]
    neutral: u32,
    #[serde(rename = "Weekly Sentiment")]
    sentiment: String,
    #[serde(rename = "Reasoning")]
    reasoning: &'a str,
    #[serde(rename = "Summary")]
    summary: &'a str,
}

pub struct LogStore {
    analysis_log: PathBuf,
    weekly_log: PathBuf,
}

impl LogStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            analysis_log: config.analysis_log.clone(),
            weekly_log: config.weekly_log.clone(),
        }
    }

    /// Read the full analysis log, oldest row first.
    ///
    /// A missing file reads as an empty history. Rows that fail to decode
    /// are skipped with a warning rather than aborting the read; the
    /// aggregator is built for lossy input anyway.
    pub fn read_rows(&self) -> Result<Vec<LogRow>, StoreError> {
        if !self.analysis_log.exists() {
            return Ok(Vec::new());
        }

        let file = std::fs::File::open(&self.analysis_log)?;
        let mut rows = Vec::new();

        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<LogRow>(&line) {
                Ok(row) => rows.push(row),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping undecodable log row");
                }
            }
        }

        Ok(rows)
    }

    /// Append one daily analysis row to the analysis log.
    pub fn append_analysis(
        &self,
        timestamp: &str,
        btc: f64,
        eth: f64,
        record: &AnalysisRecord,
    ) -> Result<(), StoreError> {
        let row = LogRow {
            timestamp: timestamp.to_string(),
            btc: json!(btc),
            eth: json!(eth),
            sentiment: record.sentiment.to_string(),
            reasoning: record.reasoning.clone(),
            summary: record.summary.clone(),
        };

        self.append_line(&self.analysis_log, &row)?;
        tracing::info!(path = %self.analysis_log.display(), timestamp, "Analysis row appended");
        Ok(())
    }

    /// Append one weekly report row to the weekly log.
    pub fn append_weekly(
        &self,
        date: &str,
        stats: &WindowStats,
        record: &WeeklyRecord,
    ) -> Result<(), StoreError> {
        let row = WeeklyRow {
            date,
            avg_btc: stats.avg_btc,
            avg_eth: stats.avg_eth,
            bullish: stats.sentiment_counts.bullish,
            bearish: stats.sentiment_counts.bearish,
            neutral: stats.sentiment_counts.neutral,
            sentiment: record.sentiment.to_string(),
            reasoning: &record.reasoning,
            summary: &record.summary,
        };

        self.append_line(&self.weekly_log, &row)?;
        tracing::info!(path = %self.weekly_log.display(), date, "Weekly report appended");
        Ok(())
    }

    fn append_line<T: Serialize>(&self, path: &Path, row: &T) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(row)?;

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{encoded}")?;
        Ok(())
    }
}
