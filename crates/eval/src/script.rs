//! JavaScript and TypeScript, run in a child interpreter process.
//!
//! The child gets an empty environment (apart from `PATH` and two
//! `SANDBOX_*` variables), runs in the temp directory, reads the snippet
//! from stdin and evaluates it in a fresh `vm` context whose only global is
//! the sandbox console. Results come back as record lines on stdout.

use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};
use sandbox_config::EvaluatorSettings;
use sandbox_console::{ConsoleLevel, ConsoleSink};
use sandbox_core::Language;
use serde::Deserialize;
use serde_json::Value;
use wait_timeout::ChildExt;

use crate::{EvalOutcome, Evaluator};

const PRELUDE: &str = include_str!("prelude.js");

/// Marks a stdout line as a protocol record (ASCII record separator).
const RECORD_MARKER: char = '\u{1e}';

/// Extra time the process gets on top of the in-context timeout.
const STARTUP_GRACE: Duration = Duration::from_millis(1000);

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum Record {
    Console {
        level: ConsoleLevel,
        #[serde(default)]
        args: Vec<Value>,
    },
    Result {
        value: Option<Value>,
        display: Option<String>,
    },
    Error {
        message: String,
        stack: Option<String>,
    },
}

/// Evaluates script snippets with an external interpreter.
#[derive(Debug, Clone)]
pub struct ScriptEvaluator {
    program: String,
    args: Vec<String>,
    language: Language,
    timeout_ms: u64,
}

impl ScriptEvaluator {
    pub fn new(settings: &EvaluatorSettings, language: Language) -> Self {
        Self {
            program: settings.interpreter.clone(),
            args: settings.interpreter_args.clone(),
            language,
            timeout_ms: settings.timeout_ms,
        }
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg("-e")
            .arg(PRELUDE)
            .env_clear()
            .env("SANDBOX_LANGUAGE", self.language.as_str())
            .env("SANDBOX_TIMEOUT_MS", self.timeout_ms.to_string())
            .current_dir(std::env::temp_dir())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(path) = std::env::var_os("PATH") {
            command.env("PATH", path);
        }
        command
    }

    fn run(&self, source: &str, console: &ConsoleSink) -> Result<EvalOutcome> {
        let mut child = self
            .command()
            .spawn()
            .with_context(|| format!("Failed to start '{}'", self.program))?;

        let writer = child.stdin.take().map(|mut stdin| {
            let source = source.to_string();
            thread::spawn(move || {
                // The child may exit without reading; a broken pipe is fine
                let _ = stdin.write_all(source.as_bytes());
            })
        });
        let stdout = spawn_reader(child.stdout.take());
        let stderr = spawn_reader(child.stderr.take());

        let status = wait_or_kill(&mut child, self.process_timeout())?;

        if let Some(writer) = writer {
            let _ = writer.join();
        }
        let stdout = join_reader(stdout);
        let stderr = join_reader(stderr);

        let Some(status) = status else {
            sandbox_logger::warn(format!(
                "Evaluation killed after {} ms",
                self.process_timeout().as_millis()
            ));
            return Ok(EvalOutcome::failure(format!(
                "Evaluation timed out after {} ms",
                self.timeout_ms
            )));
        };

        let outcome = collect_records(&stdout, console);
        match outcome {
            Some(outcome) => {
                if !stderr.trim().is_empty() {
                    sandbox_logger::debug(format!("Interpreter stderr: {}", stderr.trim()));
                }
                Ok(outcome)
            }
            None => Ok(missing_outcome(&self.program, status, &stderr)),
        }
    }

    fn process_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms) + STARTUP_GRACE
    }
}

impl Evaluator for ScriptEvaluator {
    fn evaluate(&self, source: &str, console: &ConsoleSink) -> EvalOutcome {
        self.run(source, console).unwrap_or_else(|e| {
            sandbox_logger::error(format!("Script evaluation failed: {:#}", e));
            EvalOutcome::failure(format!("{:#}", e))
        })
    }
}

fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<String>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut bytes = Vec::new();
            let _ = pipe.read_to_end(&mut bytes);
            String::from_utf8_lossy(&bytes).into_owned()
        })
    })
}

fn join_reader(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

/// `None` when the process had to be killed.
fn wait_or_kill(child: &mut Child, timeout: Duration) -> Result<Option<ExitStatus>> {
    match child.wait_timeout(timeout)? {
        Some(status) => Ok(Some(status)),
        None => {
            child.kill()?;
            let _ = child.wait();
            Ok(None)
        }
    }
}

/// Feed console records into `console` and return the last outcome record.
fn collect_records(stdout: &str, console: &ConsoleSink) -> Option<EvalOutcome> {
    let mut outcome = None;
    for line in stdout.lines() {
        let Some(payload) = line.strip_prefix(RECORD_MARKER) else {
            if !line.trim().is_empty() {
                console.record_text(ConsoleLevel::Log, line);
            }
            continue;
        };
        match serde_json::from_str::<Record>(payload) {
            Ok(Record::Console { level, args }) => console.record(level, args),
            Ok(Record::Result { value, display }) => {
                outcome = Some(result_outcome(value, display));
            }
            Ok(Record::Error { message, stack }) => {
                outcome = Some(EvalOutcome::Failure {
                    message,
                    trace: stack,
                });
            }
            Err(e) => {
                sandbox_logger::warn(format!("Malformed record from interpreter: {}", e));
                console.record_text(ConsoleLevel::Log, payload);
            }
        }
    }
    outcome
}

fn result_outcome(value: Option<Value>, display: Option<String>) -> EvalOutcome {
    if let Some(display) = display {
        return EvalOutcome::value(display);
    }
    match value {
        Some(value) => EvalOutcome::value(
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string()),
        ),
        None => EvalOutcome::undefined(),
    }
}

fn missing_outcome(program: &str, status: ExitStatus, stderr: &str) -> EvalOutcome {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        EvalOutcome::failure(format!("'{}' produced no result ({})", program, status))
    } else {
        EvalOutcome::failure(stderr)
    }
}
