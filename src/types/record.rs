//! Record schemas: Sentiment, AnalysisRecord, WeeklyRecord, validation

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Market sentiment category.
///
/// `Unknown` is reserved for the fallback path: `validate` never produces it,
/// and the aggregator never counts it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
    Unknown,
}

impl Sentiment {
    /// Match a label against the three real categories.
    ///
    /// Exact-case, untrimmed. Mismatched casing from the model ("bullish")
    /// is rejected rather than normalized, matching how the log store
    /// records labels.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Bullish" => Some(Self::Bullish),
            "Bearish" => Some(Self::Bearish),
            "Neutral" => Some(Self::Neutral),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bullish => "Bullish",
            Self::Bearish => "Bearish",
            Self::Neutral => "Neutral",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a structured candidate failed schema validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("candidate is not a JSON object")]
    NotAnObject,
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("field `{0}` must be a non-empty string")]
    EmptyField(&'static str),
    #[error("unrecognized sentiment `{0}`")]
    UnrecognizedSentiment(String),
}

/// Seam between the resolver and the two record shapes.
///
/// Both records carry the same three fields; this trait lets `validate` and
/// the fallback construction be written once.
pub trait StructuredRecord: Sized {
    /// Short name for log output.
    const KIND: &'static str;

    fn new(summary: String, sentiment: Sentiment, reasoning: String) -> Self;
}

/// Daily market analysis produced by the analysis pipeline.
///
/// Immutable once constructed; appended to the analysis log and later read
/// back (as a `LogRow`) by the aggregator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisRecord {
    /// Brief market summary (1-2 sentences)
    pub summary: String,
    /// Market sentiment classification
    pub sentiment: Sentiment,
    /// Brief explanation for the sentiment
    pub reasoning: String,
}

/// Weekly narrative derived from aggregated log statistics.
///
/// Its sentiment is the model's judgment over the whole window, not a single
/// day's value, and may disagree with the raw majority count in
/// [`super::WindowStats`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklyRecord {
    /// Weekly market summary (2-3 sentences)
    pub summary: String,
    /// Overall weekly sentiment
    pub sentiment: Sentiment,
    /// Brief explanation for the weekly sentiment
    pub reasoning: String,
}

impl StructuredRecord for AnalysisRecord {
    const KIND: &'static str = "daily analysis";

    fn new(summary: String, sentiment: Sentiment, reasoning: String) -> Self {
        Self { summary, sentiment, reasoning }
    }
}

impl StructuredRecord for WeeklyRecord {
    const KIND: &'static str = "weekly report";

    fn new(summary: String, sentiment: Sentiment, reasoning: String) -> Self {
        Self { summary, sentiment, reasoning }
    }
}

fn required_str<'a>(
    candidate: &'a serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    let value = candidate
        .get(field)
        .ok_or(ValidationError::MissingField(field))?;
    match value.as_str() {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(ValidationError::EmptyField(field)),
    }
}

/// Validate a structured candidate against the record schema.
///
/// A candidate is valid iff all three fields are present, `summary` and
/// `reasoning` are non-empty strings, and `sentiment` is exactly one of
/// `Bullish`, `Bearish`, `Neutral`. `Unknown` is rejected here so that only
/// the fallback path can produce it.
pub fn validate<T: StructuredRecord>(candidate: &Value) -> Result<T, ValidationError> {
    let map = candidate.as_object().ok_or(ValidationError::NotAnObject)?;

    let summary = required_str(map, "summary")?;
    let label = required_str(map, "sentiment")?;
    let reasoning = required_str(map, "reasoning")?;

    let sentiment = Sentiment::from_label(label)
        .ok_or_else(|| ValidationError::UnrecognizedSentiment(label.to_string()))?;

    Ok(T::new(summary.to_string(), sentiment, reasoning.to_string()))
}
