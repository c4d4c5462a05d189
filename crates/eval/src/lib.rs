//! Evaluation of sandbox snippets.
//!
//! Each language has an [`Evaluator`]. Faults inside the snippet are values
//! (`EvalOutcome::Failure`), never errors, so the caller always has
//! something to show. Evaluations run off the UI thread in an
//! [`EvalWorker`].

mod json;
mod markup;
mod outcome;
mod script;
mod worker;

pub use json::JsonEvaluator;
pub use markup::{html_to_text, MarkupEvaluator};
pub use outcome::EvalOutcome;
pub use script::ScriptEvaluator;
pub use worker::{EvalRequest, EvalResponse, EvalWorker};

use sandbox_config::EvaluatorSettings;
use sandbox_console::ConsoleSink;
use sandbox_core::Language;

/// Runs one snippet. Console output goes to `console` only.
pub trait Evaluator: Send {
    fn evaluate(&self, source: &str, console: &ConsoleSink) -> EvalOutcome;
}

/// Evaluator for `language`.
pub fn evaluator_for(language: Language, settings: &EvaluatorSettings) -> Box<dyn Evaluator> {
    match language {
        Language::Json => Box::new(JsonEvaluator),
        Language::JavaScript | Language::TypeScript => {
            Box::new(ScriptEvaluator::new(settings, language))
        }
        Language::Html => Box::new(MarkupEvaluator),
    }
}
