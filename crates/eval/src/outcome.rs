//! Tagged result of one evaluation.

/// What running a snippet produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalOutcome {
    /// The snippet completed. `None` means it produced no value
    /// (`undefined`), in which case the previous output stays visible.
    Success { value: Option<String> },
    /// The snippet threw, failed to parse, or could not be run.
    Failure {
        message: String,
        trace: Option<String>,
    },
}

impl EvalOutcome {
    pub fn value(value: impl Into<String>) -> Self {
        EvalOutcome::Success {
            value: Some(value.into()),
        }
    }

    pub fn undefined() -> Self {
        EvalOutcome::Success { value: None }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        EvalOutcome::Failure {
            message: message.into(),
            trace: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, EvalOutcome::Success { .. })
    }

    /// Text for the output pane. `previous` is shown again for `undefined`.
    pub fn display_text(&self, previous: Option<&str>) -> String {
        match self {
            EvalOutcome::Success { value: Some(v) } => v.clone(),
            EvalOutcome::Success { value: None } => previous.unwrap_or("undefined").to_string(),
            EvalOutcome::Failure { message, trace } => match trace {
                // V8 stacks already start with the message
                Some(trace) if trace.contains(message.as_str()) => trace.clone(),
                Some(trace) => format!("{}\n{}", message, trace),
                None => message.clone(),
            },
        }
    }
}
