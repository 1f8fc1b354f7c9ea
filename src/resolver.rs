//! Output validator and fallback resolver
//!
//! Turns raw generation output into a well-typed record. [`resolve`] is total
//! over its input: every output, however malformed, yields a record. Parse
//! and validation failures produce a deterministic fallback carrying
//! `Sentiment::Unknown` and the raw output as its summary, so the pipelines
//! can treat generation output as always-structured.

use crate::types::{validate, Sentiment, StructuredRecord, ValidationError};
use serde_json::Value;
use thiserror::Error;

/// Raw output of a generation backend, before extraction.
///
/// Backends that speak plain text return `Text`; backends that already
/// decode a JSON body may hand over `Structured` directly.
#[derive(Debug, Clone, PartialEq)]
pub enum RawOutput {
    Text(String),
    Structured(Value),
}

impl RawOutput {
    /// Verbatim text of the output. Structured values are rendered back to
    /// their JSON string form; this is what lands in a fallback summary.
    pub fn display_text(&self) -> String {
        match self {
            RawOutput::Text(text) => text.clone(),
            RawOutput::Structured(value) => value.to_string(),
        }
    }
}

/// Reasoning placeholder carried by every fallback record.
pub const FALLBACK_REASONING: &str = "AI output was not structured JSON.";

/// Why extraction failed. Both causes are absorbed into the fallback record;
/// neither crosses the pipeline boundary.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("output is not parseable JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("output failed schema validation: {0}")]
    Validation(#[from] ValidationError),
}

/// Extract a validated record, reporting the failure cause on the `Err` path.
///
/// Text output is parsed as JSON first; structured output goes straight to
/// schema validation.
pub fn try_resolve<T: StructuredRecord>(raw: &RawOutput) -> Result<T, ResolveError> {
    let candidate = match raw {
        RawOutput::Text(text) => serde_json::from_str::<Value>(text)?,
        RawOutput::Structured(value) => value.clone(),
    };
    Ok(validate::<T>(&candidate)?)
}

/// Resolve raw generation output into a record. Never fails.
///
/// On extraction failure the fallback record keeps the raw output verbatim
/// as its summary, with `Sentiment::Unknown` and a fixed reasoning string.
pub fn resolve<T: StructuredRecord>(raw: &RawOutput) -> T {
    match try_resolve::<T>(raw) {
        Ok(record) => {
            tracing::debug!(kind = T::KIND, "structured output validated");
            record
        }
        Err(cause) => {
            tracing::warn!(
                kind = T::KIND,
                error = %cause,
                raw = %raw.display_text(),
                "could not extract structured output, using fallback record"
            );
            T::new(
                raw.display_text(),
                Sentiment::Unknown,
                FALLBACK_REASONING.to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnalysisRecord, WeeklyRecord};
    use serde_json::json;

    const WELL_FORMED: &str =
        r#"{"summary":"Market is stable.","sentiment":"Neutral","reasoning":"Prices flat."}"#;

    #[test]
    fn test_well_formed_text_passes_through() {
        let raw = RawOutput::Text(WELL_FORMED.to_string());
        let record: AnalysisRecord = resolve(&raw);

        assert_eq!(record.summary, "Market is stable.");
        assert_eq!(record.sentiment, Sentiment::Neutral);
        assert_eq!(record.reasoning, "Prices flat.");
    }

    #[test]
    fn test_structured_input_passes_through() {
        let raw = RawOutput::Structured(json!({
            "summary": "BTC rallied hard.",
            "sentiment": "Bullish",
            "reasoning": "Strong inflows."
        }));
        let record: WeeklyRecord = resolve(&raw);

        assert_eq!(record.sentiment, Sentiment::Bullish);
        assert_eq!(record.summary, "BTC rallied hard.");
    }

    #[test]
    fn test_prose_output_falls_back() {
        let prose = "The market looks mixed today, hard to call.";
        let raw = RawOutput::Text(prose.to_string());
        let record: AnalysisRecord = resolve(&raw);

        assert_eq!(record.summary, prose);
        assert_eq!(record.sentiment, Sentiment::Unknown);
        assert_eq!(record.reasoning, FALLBACK_REASONING);
    }

    #[test]
    fn test_invalid_schema_falls_back_with_rendered_json() {
        let raw = RawOutput::Structured(json!({"verdict": "up"}));
        let record: AnalysisRecord = resolve(&raw);

        assert_eq!(record.sentiment, Sentiment::Unknown);
        assert_eq!(record.summary, r#"{"verdict":"up"}"#);
    }

    #[test]
    fn test_wrong_case_sentiment_falls_back() {
        let raw = RawOutput::Text(
            r#"{"summary":"Up day.","sentiment":"bullish","reasoning":"Momentum."}"#.to_string(),
        );
        let record: AnalysisRecord = resolve(&raw);

        assert_eq!(record.sentiment, Sentiment::Unknown);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        for raw in [
            RawOutput::Text(WELL_FORMED.to_string()),
            RawOutput::Text("not json at all".to_string()),
            RawOutput::Structured(json!(null)),
        ] {
            let first: AnalysisRecord = resolve(&raw);
            let second: AnalysisRecord = resolve(&raw);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_never_panics_on_hostile_input() {
        let hostile = [
            "",
            "{",
            "null",
            "[1,2,3]",
            "\"quoted\"",
            "{\"summary\": null}",
            "\u{0000}\u{FFFD}",
        ];
        for text in hostile {
            let record: AnalysisRecord = resolve(&RawOutput::Text(text.to_string()));
            assert_eq!(record.sentiment, Sentiment::Unknown);
            assert_eq!(record.summary, text);
        }
    }

    #[test]
    fn test_try_resolve_reports_cause() {
        let parse_err = try_resolve::<AnalysisRecord>(&RawOutput::Text("nope".to_string()));
        assert!(matches!(parse_err, Err(ResolveError::Parse(_))));

        let validation_err = try_resolve::<AnalysisRecord>(&RawOutput::Structured(json!({})));
        assert!(matches!(validation_err, Err(ResolveError::Validation(_))));
    }
}
