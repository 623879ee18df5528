//! Append-only JSONL history of transform operations.
//!
//! Each apply and undo appends one entry to the history log (default
//! `~/.squeeze/history.jsonl`), read back by `squeeze stats`. All writes
//! are best-effort — a failure to log never fails the operation that
//! produced it.

use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::schema::LoggingConfig;

// ---------------------------------------------------------------------------
// History entry
// ---------------------------------------------------------------------------

/// A single entry in the history log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    /// Operation recorded: `"apply"` or `"undo"`.
    pub action: String,
    /// Display name of the document the operation touched.
    pub document: String,
    /// Blank-line runs collapsed (0 for undo entries).
    #[serde(default)]
    pub occurrences: usize,
    /// Document size before the operation (bytes).
    pub original_bytes: usize,
    /// Document size after the operation (bytes).
    pub final_bytes: usize,
}

impl HistoryEntry {
    /// Bytes removed by this entry's operation (0 when the document grew,
    /// as an undo typically does).
    pub fn bytes_removed(&self) -> usize {
        self.original_bytes.saturating_sub(self.final_bytes)
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Record an apply operation.
pub fn log_apply(
    logging: &LoggingConfig,
    document: &str,
    occurrences: usize,
    original_bytes: usize,
    final_bytes: usize,
) {
    log_entry(logging, "apply", document, occurrences, original_bytes, final_bytes);
}

/// Record an undo operation.
pub fn log_undo(logging: &LoggingConfig, document: &str, restored_bytes: usize) {
    log_entry(logging, "undo", document, 0, restored_bytes, restored_bytes);
}

fn log_entry(
    logging: &LoggingConfig,
    action: &str,
    document: &str,
    occurrences: usize,
    original_bytes: usize,
    final_bytes: usize,
) {
    if !logging.enabled {
        return;
    }

    let entry = HistoryEntry {
        timestamp: Utc::now().to_rfc3339(),
        action: action.to_string(),
        document: document.to_string(),
        occurrences,
        original_bytes,
        final_bytes,
    };

    let _ = append_entry(logging, &entry);
}

fn append_entry(logging: &LoggingConfig, entry: &HistoryEntry) -> Result<()> {
    let Some(path) = history_path(logging) else {
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(entry)?;
    writeln!(file, "{json}")?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Reading entries
// ---------------------------------------------------------------------------

/// Read all history entries, oldest first.
///
/// Silently skips malformed lines. Returns an empty vec if the file does
/// not exist or cannot be read.
pub fn read_all_entries(logging: &LoggingConfig) -> Vec<HistoryEntry> {
    let Some(path) = history_path(logging) else {
        return Vec::new();
    };

    let Ok(file) = fs::File::open(path) else {
        return Vec::new();
    };

    let reader = BufReader::new(file);
    reader
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| serde_json::from_str::<HistoryEntry>(&line).ok())
        .collect()
}

/// Read history entries filtered to the last N days.
///
/// If `days` is `None`, returns all entries.
pub fn read_entries_since_days(logging: &LoggingConfig, days: Option<u32>) -> Vec<HistoryEntry> {
    let entries = read_all_entries(logging);

    let Some(days) = days else {
        return entries;
    };

    let cutoff = Utc::now() - chrono::Duration::days(i64::from(days));
    let cutoff_str = cutoff.to_rfc3339();

    entries
        .into_iter()
        .filter(|e| e.timestamp >= cutoff_str)
        .collect()
}

/// Resolve the configured history log path, expanding a leading `~`.
fn history_path(logging: &LoggingConfig) -> Option<PathBuf> {
    expand_home(&logging.path)
}

/// Expand a leading `~` to the home directory.
fn expand_home(path: &str) -> Option<PathBuf> {
    if let Some(rest) = path.strip_prefix("~/") {
        return dirs::home_dir().map(|home| home.join(rest));
    }
    if path == "~" {
        return dirs::home_dir();
    }
    Some(PathBuf::from(path))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_round_trips_through_json() {
        let entry = HistoryEntry {
            timestamp: "2026-01-01T00:00:00+00:00".to_string(),
            action: "apply".to_string(),
            document: "notes.md".to_string(),
            occurrences: 2,
            original_bytes: 120,
            final_bytes: 100,
        };

        let json = serde_json::to_string(&entry).unwrap();
        let back: HistoryEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.action, "apply");
        assert_eq!(back.occurrences, 2);
        assert_eq!(back.bytes_removed(), 20);
    }

    #[test]
    fn bytes_removed_saturates_when_document_grew() {
        let entry = HistoryEntry {
            timestamp: "2026-01-01T00:00:00+00:00".to_string(),
            action: "undo".to_string(),
            document: "notes.md".to_string(),
            occurrences: 0,
            original_bytes: 100,
            final_bytes: 120,
        };
        assert_eq!(entry.bytes_removed(), 0);
    }

    #[test]
    fn expand_home_handles_tilde_prefix() {
        let expanded = expand_home("~/.squeeze/history.jsonl").unwrap();
        assert!(expanded.ends_with(".squeeze/history.jsonl"));
        assert!(!expanded.to_string_lossy().contains('~'));
    }

    #[test]
    fn expand_home_leaves_plain_paths_alone() {
        let expanded = expand_home("/tmp/history.jsonl").unwrap();
        assert_eq!(expanded, PathBuf::from("/tmp/history.jsonl"));
    }

    #[test]
    fn disabled_logging_writes_nothing() {
        let logging = LoggingConfig {
            enabled: false,
            path: "/nonexistent/should-not-be-created.jsonl".to_string(),
        };
        log_apply(&logging, "notes.md", 1, 10, 8);
        assert!(!PathBuf::from("/nonexistent/should-not-be-created.jsonl").exists());
    }
}
