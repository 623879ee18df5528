//! Single-slot undo state with file-backed persistence.
//!
//! Apply stores the pre-transform text here; undo reads it back. The slot
//! holds at most one snapshot: every apply overwrites it, and undo reads
//! without consuming, so undo stays repeatable until the next apply. There
//! is no multi-level history.
//!
//! The slot itself is plain in-memory state passed into the operations.
//! Because the CLI host is a short-lived process, it persists the slot to
//! `~/.squeeze/undo.json` between invocations; that file I/O is
//! best-effort and never blocks an operation.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// The most recent pre-transform snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// RFC 3339 timestamp of the apply that produced this snapshot.
    pub saved_at: String,
    /// Display name of the document the snapshot came from. For the file
    /// host this is the file path.
    pub document: String,
    /// Verbatim pre-transform text.
    pub text: String,
}

// ---------------------------------------------------------------------------
// UndoSlot
// ---------------------------------------------------------------------------

/// Single-slot cache of the most recent pre-transform text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UndoSlot {
    snapshot: Option<Snapshot>,
}

impl UndoSlot {
    /// A slot holding nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the persisted slot, or an empty one if the state file is
    /// missing or unreadable.
    pub fn load() -> Self {
        let Some(path) = slot_path() else {
            return Self::empty();
        };
        let Ok(content) = fs::read_to_string(path) else {
            return Self::empty();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Overwrite the slot with a new snapshot of `text` taken from
    /// `document`.
    pub fn store(&mut self, document: &str, text: &str) {
        self.snapshot = Some(Snapshot {
            saved_at: Utc::now().to_rfc3339(),
            document: document.to_string(),
            text: text.to_string(),
        });
    }

    /// The held snapshot, if any. Reading does not consume it.
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_none()
    }

    /// Persist the slot to `~/.squeeze/undo.json`.
    pub fn persist(&self) -> Result<()> {
        let Some(path) = slot_path() else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string(self)?)?;
        Ok(())
    }
}

/// Path to the persisted undo slot.
fn slot_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".squeeze").join("undo.json"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slot_has_no_snapshot() {
        let slot = UndoSlot::empty();
        assert!(slot.is_empty());
        assert!(slot.snapshot().is_none());
    }

    #[test]
    fn store_overwrites_previous_snapshot() {
        let mut slot = UndoSlot::empty();
        slot.store("notes.md", "first");
        slot.store("notes.md", "second");

        let snapshot = slot.snapshot().expect("slot should hold a snapshot");
        assert_eq!(snapshot.text, "second");
    }

    #[test]
    fn reading_does_not_consume() {
        let mut slot = UndoSlot::empty();
        slot.store("notes.md", "content");

        assert!(slot.snapshot().is_some());
        assert!(slot.snapshot().is_some());
        assert!(!slot.is_empty());
    }

    #[test]
    fn slot_round_trips_through_json() {
        let mut slot = UndoSlot::empty();
        slot.store("a/b.md", "text with\n\nblank lines");

        let json = serde_json::to_string(&slot).unwrap();
        let restored: UndoSlot = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.snapshot(), slot.snapshot());
    }
}
