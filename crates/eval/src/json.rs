//! JSON documents: validate and pretty-print.

use sandbox_console::ConsoleSink;
use serde_json::Value;

use crate::{EvalOutcome, Evaluator};

/// Parses the source as JSON; the value is the pretty-printed document.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonEvaluator;

impl Evaluator for JsonEvaluator {
    fn evaluate(&self, source: &str, _console: &ConsoleSink) -> EvalOutcome {
        if source.trim().is_empty() {
            return EvalOutcome::undefined();
        }
        match serde_json::from_str::<Value>(source) {
            Ok(value) => match serde_json::to_string_pretty(&value) {
                Ok(text) => EvalOutcome::value(text),
                Err(e) => EvalOutcome::failure(e.to_string()),
            },
            Err(e) => EvalOutcome::failure(format!("SyntaxError: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretty_prints_valid_json() {
        let outcome = JsonEvaluator.evaluate(r#"{"a":[1,2],"b":null}"#, &ConsoleSink::default());
        assert_eq!(
            outcome,
            EvalOutcome::value("{\n  \"a\": [\n    1,\n    2\n  ],\n  \"b\": null\n}")
        );
    }

    #[test]
    fn test_reports_position_of_syntax_error() {
        let outcome = JsonEvaluator.evaluate("{\n  \"a\": 1,\n}", &ConsoleSink::default());
        match outcome {
            EvalOutcome::Failure { message, trace } => {
                assert!(message.starts_with("SyntaxError: "));
                assert!(message.contains("line 3"));
                assert!(trace.is_none());
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_source_is_undefined() {
        assert_eq!(
            JsonEvaluator.evaluate("  \n", &ConsoleSink::default()),
            EvalOutcome::undefined()
        );
    }
}
