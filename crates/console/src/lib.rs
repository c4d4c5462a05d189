//! Console capture for evaluated code.
//!
//! A `ConsoleSink` is handed to an evaluator as a capability: the evaluated
//! code can only reach the sink it was given, and nothing process-wide is
//! replaced. Entries are kept in a bounded ring that the output panel
//! observes through a revision counter.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Console method the evaluated code called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleLevel {
    Log,
    Info,
    Warn,
    Error,
    Debug,
    Trace,
}

impl ConsoleLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ConsoleLevel::Log => "LOG",
            ConsoleLevel::Info => "INFO",
            ConsoleLevel::Warn => "WARN",
            ConsoleLevel::Error => "ERROR",
            ConsoleLevel::Debug => "DEBUG",
            ConsoleLevel::Trace => "TRACE",
        }
    }
}

impl fmt::Display for ConsoleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One captured console call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleEntry {
    pub timestamp: DateTime<Utc>,
    pub level: ConsoleLevel,
    pub args: Vec<Value>,
    /// Evaluation run that produced the entry; 0 outside any run
    #[serde(default)]
    pub run: u64,
}

impl ConsoleEntry {
    pub fn new(level: ConsoleLevel, args: Vec<Value>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            args,
            run: 0,
        }
    }

    /// Arguments joined by spaces; strings as-is, everything else as JSON.
    pub fn message(&self) -> String {
        self.args
            .iter()
            .map(|arg| match arg {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `[timestamp] [LEVEL] message`
    pub fn to_line(&self) -> String {
        format!(
            "[{}] [{}] {}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.level,
            self.message()
        )
    }
}

#[derive(Debug)]
struct ConsoleLog {
    entries: VecDeque<ConsoleEntry>,
    max_entries: usize,
    revision: u64,
    current_run: u64,
}

/// Shared, bounded log of console entries.
#[derive(Debug, Clone)]
pub struct ConsoleSink {
    inner: Arc<Mutex<ConsoleLog>>,
}

impl ConsoleSink {
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ConsoleLog {
                entries: VecDeque::new(),
                max_entries: max_entries.max(1),
                revision: 0,
                current_run: 0,
            })),
        }
    }

    /// Append an entry, evicting the oldest past capacity.
    pub fn push(&self, mut entry: ConsoleEntry) {
        if let Ok(mut log) = self.inner.lock() {
            entry.run = log.current_run;
            log.entries.push_back(entry);
            while log.entries.len() > log.max_entries {
                log.entries.pop_front();
            }
            log.revision += 1;
        }
    }

    /// Record a call at `level` with `args`.
    pub fn record(&self, level: ConsoleLevel, args: Vec<Value>) {
        self.push(ConsoleEntry::new(level, args));
    }

    /// Record a single string argument.
    pub fn record_text(&self, level: ConsoleLevel, text: impl Into<String>) {
        self.record(level, vec![Value::String(text.into())]);
    }

    pub fn entries(&self) -> Vec<ConsoleEntry> {
        self.inner
            .lock()
            .map(|log| log.entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|log| log.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Changes on every push and clear.
    pub fn revision(&self) -> u64 {
        self.inner.lock().map(|log| log.revision).unwrap_or(0)
    }

    /// Tag entries pushed from now on with `run`.
    pub fn begin_run(&self, run: u64) {
        if let Ok(mut log) = self.inner.lock() {
            log.current_run = run;
        }
    }

    /// Drop the entries of a superseded run. Returns how many were removed.
    pub fn discard_run(&self, run: u64) -> usize {
        if run == 0 {
            return 0;
        }
        let Ok(mut log) = self.inner.lock() else {
            return 0;
        };
        let before = log.entries.len();
        log.entries.retain(|entry| entry.run != run);
        let removed = before - log.entries.len();
        if removed > 0 {
            log.revision += 1;
        }
        removed
    }

    pub fn clear(&self) {
        if let Ok(mut log) = self.inner.lock() {
            log.entries.clear();
            log.revision += 1;
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new(500)
    }
}
