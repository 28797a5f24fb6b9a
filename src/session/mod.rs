//! Session state: the code runner, the responder, and a bounded JSON history
//! log, bundled into one explicit object passed to the handlers.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::config::{history_path, Config};
use crate::responder::{CannedResponder, Responder};
use crate::runner::CodeRunner;

/// Newest entries win; older ones are dropped past this count.
const HISTORY_LIMIT: usize = 100;
/// Stored results are clipped to this many characters.
const RESULT_CLIP: usize = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub command: String,
    pub result: String,
}

#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
    limit: usize,
}

impl HistoryLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path, limit: HISTORY_LIMIT }
    }

    pub fn append(&self, command: &str, result: &str) -> Result<()> {
        let mut entries = self.read()?;
        entries.push(HistoryEntry {
            timestamp: now_rfc3339(),
            command: command.to_string(),
            result: clip(result, RESULT_CLIP),
        });
        let overflow = entries.len().saturating_sub(self.limit);
        if overflow > 0 {
            entries.drain(..overflow);
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }

    pub fn read(&self) -> Result<Vec<HistoryEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// The newest `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> Result<Vec<HistoryEntry>> {
        let entries = self.read()?;
        let skip = entries.len().saturating_sub(n);
        Ok(entries.into_iter().skip(skip).collect())
    }
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| String::from("unknown"))
}

fn clip(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(limit).collect();
    clipped.push_str("...");
    clipped
}

/// Everything one interactive (or one-shot) session needs.
pub struct Session {
    pub config: Config,
    pub runner: CodeRunner,
    pub responder: Box<dyn Responder>,
    history: HistoryLog,
}

impl Session {
    pub fn new(config: Config) -> Result<Self> {
        let runner = CodeRunner::with_timeout(config.timeout_duration())?;
        Ok(Self {
            config,
            runner,
            responder: Box::new(CannedResponder),
            history: HistoryLog::new(history_path()),
        })
    }

    #[cfg(test)]
    pub fn with_history(config: Config, history: HistoryLog) -> Result<Self> {
        let runner = CodeRunner::with_timeout(config.timeout_duration())?;
        Ok(Self { config, runner, responder: Box::new(CannedResponder), history })
    }

    /// Append to the history log unless disabled by config. Persistence
    /// failures are reported but never abort the session.
    pub fn record(&self, command: &str, result: &str) {
        if !self.config.auto_save_history {
            return;
        }
        if let Err(e) = self.history.append(command, result) {
            eprintln!("warning: could not save history: {}", e);
        }
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }
}
