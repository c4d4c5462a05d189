//! Background evaluation thread.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use sandbox_config::EvaluatorSettings;
use sandbox_console::ConsoleSink;
use sandbox_core::Language;

use crate::{evaluator_for, EvalOutcome};

/// Snippet submitted for evaluation.
#[derive(Debug, Clone)]
pub struct EvalRequest {
    pub generation: u64,
    pub language: Language,
    pub source: String,
}

/// Result of one request.
#[derive(Debug, Clone)]
pub struct EvalResponse {
    pub generation: u64,
    pub language: Language,
    pub outcome: EvalOutcome,
    pub elapsed: Duration,
}

/// Owns the evaluation thread.
///
/// Requests are numbered; the thread skips requests that were superseded
/// while it was busy and [`EvalWorker::try_recv`] drops responses older than
/// the latest submission, together with their console entries.
pub struct EvalWorker {
    requests: Sender<EvalRequest>,
    responses: Receiver<EvalResponse>,
    console: ConsoleSink,
    generation: u64,
}

impl EvalWorker {
    pub fn spawn(settings: EvaluatorSettings, console: ConsoleSink) -> Result<Self> {
        let (request_tx, request_rx) = mpsc::channel::<EvalRequest>();
        let (response_tx, response_rx) = mpsc::channel::<EvalResponse>();

        thread::Builder::new()
            .name("sandbox-eval".to_string())
            .spawn({
                let console = console.clone();
                move || run_worker(settings, console, request_rx, response_tx)
            })
            .context("Failed to spawn evaluation thread")?;

        Ok(Self {
            requests: request_tx,
            responses: response_rx,
            console,
            generation: 0,
        })
    }

    /// Queue `source` and return its generation number.
    pub fn submit(&mut self, language: Language, source: impl Into<String>) -> u64 {
        self.generation += 1;
        let request = EvalRequest {
            generation: self.generation,
            language,
            source: source.into(),
        };
        if self.requests.send(request).is_err() {
            sandbox_logger::error("Evaluation thread is gone; request dropped");
        }
        self.generation
    }

    /// Latest response for the newest submission, if it has arrived.
    pub fn try_recv(&mut self) -> Option<EvalResponse> {
        let mut latest = None;
        loop {
            match self.responses.try_recv() {
                Ok(response) if response.generation == self.generation => latest = Some(response),
                Ok(stale) => {
                    let removed = self.console.discard_run(stale.generation);
                    sandbox_logger::debug(format!(
                        "Dropping stale evaluation #{} (latest #{}, {} console entries)",
                        stale.generation, self.generation, removed
                    ));
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        latest
    }

    pub fn latest_generation(&self) -> u64 {
        self.generation
    }
}

fn run_worker(
    settings: EvaluatorSettings,
    console: ConsoleSink,
    requests: Receiver<EvalRequest>,
    responses: Sender<EvalResponse>,
) {
    while let Ok(mut request) = requests.recv() {
        while let Ok(newer) = requests.try_recv() {
            request = newer;
        }

        console.begin_run(request.generation);
        let started = Instant::now();
        let outcome = evaluator_for(request.language, &settings).evaluate(&request.source, &console);
        let elapsed = started.elapsed();
        sandbox_logger::debug(format!(
            "Evaluated #{} ({}) in {} ms",
            request.generation,
            request.language,
            elapsed.as_millis()
        ));

        let response = EvalResponse {
            generation: request.generation,
            language: request.language,
            outcome,
            elapsed,
        };
        if responses.send(response).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wait_for(worker: &mut EvalWorker) -> EvalResponse {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if let Some(response) = worker.try_recv() {
                return response;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("no evaluation response within 5s");
    }

    #[test]
    fn test_response_matches_latest_submission() {
        let mut worker = EvalWorker::spawn(EvaluatorSettings::default(), ConsoleSink::default())
            .unwrap();
        worker.submit(Language::Json, "[1,");
        let generation = worker.submit(Language::Json, "{\"ok\": true}");

        let response = wait_for(&mut worker);
        assert_eq!(response.generation, generation);
        assert_eq!(response.language, Language::Json);
        assert_eq!(response.outcome, EvalOutcome::value("{\n  \"ok\": true\n}"));
        assert!(worker.try_recv().is_none());
    }

    #[test]
    fn test_generations_increase() {
        let mut worker = EvalWorker::spawn(EvaluatorSettings::default(), ConsoleSink::default())
            .unwrap();
        assert_eq!(worker.latest_generation(), 0);
        let first = worker.submit(Language::Html, "<b>a</b>");
        let second = worker.submit(Language::Html, "<b>b</b>");
        assert!(second > first);

        let response = wait_for(&mut worker);
        assert_eq!(response.outcome, EvalOutcome::value("b"));
    }

    #[cfg(unix)]
    #[test]
    fn test_stale_run_console_entries_are_dropped() {
        // The shell echoes its source back as one console entry and the result
        let script = r#"src=$(cat); printf '\036{"kind":"console","level":"log","args":["%s"]}\n\036{"kind":"result","display":"%s"}\n' "$src" "$src""#;
        let settings = EvaluatorSettings {
            interpreter: "sh".to_string(),
            interpreter_args: vec!["-c".to_string(), script.to_string()],
            ..EvaluatorSettings::default()
        };
        let console = ConsoleSink::new(10);
        let mut worker = EvalWorker::spawn(settings, console.clone()).unwrap();

        worker.submit(Language::JavaScript, "first");
        let deadline = Instant::now() + Duration::from_secs(5);
        while console.is_empty() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(console.len(), 1);

        worker.submit(Language::JavaScript, "second");
        let response = wait_for(&mut worker);
        assert_eq!(response.outcome, EvalOutcome::value("second"));
        let messages: Vec<String> = console.entries().iter().map(|e| e.message()).collect();
        assert_eq!(messages, vec!["second"]);
    }
}
