//! Shared data structures for the crypto monitoring pipeline
//!
//! This module defines the core types for both pipelines:
//! - `AnalysisRecord` / `WeeklyRecord`: validated generation output
//! - `Sentiment`: fixed category set, with `Unknown` reserved for fallback
//! - `LogRow`: loosely-typed historical input read from the analysis log
//! - `WindowStats` / `SentimentCounts`: aggregation output

mod log;
mod record;

pub use log::*;
pub use record::*;
