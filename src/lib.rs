//! coinwatch: AI crypto market monitor
//!
//! Ingests BTC/ETH spot quotes, asks a generation backend for a structured
//! market opinion, and appends the result to an append-only log. Weekly, it
//! aggregates the trailing log window into summary statistics and generates
//! a higher-level narrative over them.
//!
//! ## Architecture
//!
//! - **types**: record schemas, sentiment categories, validation
//! - **resolver**: structured-output extraction with deterministic fallback
//! - **aggregator**: trailing-window statistics over loosely-typed log rows
//! - **pipeline**: daily analysis and weekly report flows
//! - **llm / feed / store**: external collaborators (generation service,
//!   price feed, append-only JSONL log)

pub mod aggregator;
pub mod config;
pub mod feed;
pub mod llm;
pub mod pipeline;
pub mod resolver;
pub mod store;
pub mod types;

// Re-export configuration
pub use config::MonitorConfig;

// Re-export commonly used types
pub use types::{
    AnalysisRecord, LogRow, Sentiment, SentimentCounts, StructuredRecord, ValidationError,
    WeeklyRecord, WindowStats,
};

// Re-export pipelines and core operations
pub use aggregator::aggregate;
pub use pipeline::{DailyAnalyst, WeeklyReporter};
pub use resolver::{resolve, try_resolve, RawOutput, ResolveError};

// Re-export collaborators
pub use feed::{PriceFeed, PriceQuote};
pub use llm::{GenerationBackend, OpenAiBackend};
pub use store::{LogStore, StoreError};
