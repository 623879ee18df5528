//! Preview, apply, and undo over a host-owned document.
//!
//! The engine owns no document and no storage. It reads and writes through
//! the [`DocumentHost`] trait and keeps the one piece of mutable state —
//! the pre-transform snapshot — in an injected [`UndoSlot`]. Benign
//! conditions (no active document, nothing to undo) are outcome variants,
//! not errors; only real host I/O failures surface as `Err`.

use anyhow::Result;

use crate::collapse::{self, CollapseResult};
use crate::config::schema::CollapseConfig;

pub mod undo;

pub use undo::{Snapshot, UndoSlot};

// ---------------------------------------------------------------------------
// Host seam
// ---------------------------------------------------------------------------

/// The host adapter seam.
///
/// A host owns the active document and the user-facing surfaces. An editor
/// platform's extension points (buffer access, notice toasts, a comparison
/// modal) reduce to these five operations; the CLI's
/// [`FileHost`](crate::host::FileHost) implements them over a file path and
/// the terminal.
pub trait DocumentHost {
    /// Read the full text of the active document. `Ok(None)` means there is
    /// no active document.
    fn read_document(&self) -> Result<Option<String>>;

    /// Replace the full text of the active document.
    fn write_document(&mut self, text: &str) -> Result<()>;

    /// Show a transient, non-blocking notice to the user.
    fn notify(&self, message: &str);

    /// Display a before/after comparison of a proposed change.
    fn show_comparison(&self, original: &str, transformed: &str);

    /// Display label for the active document.
    fn document_name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of an apply operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The document was rewritten. `occurrences` may be 0, in which case
    /// the written text equals the original.
    Applied {
        occurrences: usize,
        original_bytes: usize,
        final_bytes: usize,
    },
    /// No active document; nothing was touched.
    NoDocument,
}

/// Result of a preview operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewOutcome {
    /// The comparison was shown; `occurrences` runs would be collapsed.
    Previewed { occurrences: usize },
    /// No active document; nothing was shown.
    NoDocument,
}

/// Result of an undo operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoOutcome {
    /// The snapshot was written back to `document`.
    Restored { document: String },
    /// The slot was empty; nothing was touched.
    NothingToUndo,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Compute the collapse for the active document and show a before/after
/// comparison, without writing anything back. Neither the document nor the
/// undo slot is mutated.
pub fn preview<H: DocumentHost>(host: &H, config: &CollapseConfig) -> Result<PreviewOutcome> {
    let Some(original) = host.read_document()? else {
        host.notify("No active document to preview.");
        return Ok(PreviewOutcome::NoDocument);
    };

    let CollapseResult { text, occurrences } = collapse::collapse(
        &original,
        config.consecutive_line_threshold,
        config.replacement_width,
    );

    host.show_comparison(&original, &text);
    Ok(PreviewOutcome::Previewed { occurrences })
}

/// Collapse blank-line runs in the active document and write the result
/// back, keeping the pre-transform text in the undo slot.
///
/// The write-back happens before the slot is updated: a failed write
/// propagates as `Err` with both the document and the slot unchanged, so
/// the operation is all-or-nothing from the user's perspective. Every
/// successful apply overwrites the slot, including a zero-occurrence one.
pub fn apply<H: DocumentHost>(
    host: &mut H,
    slot: &mut UndoSlot,
    config: &CollapseConfig,
) -> Result<ApplyOutcome> {
    let Some(original) = host.read_document()? else {
        host.notify("No active document to modify.");
        return Ok(ApplyOutcome::NoDocument);
    };

    let CollapseResult { text, occurrences } = collapse::collapse(
        &original,
        config.consecutive_line_threshold,
        config.replacement_width,
    );

    host.write_document(&text)?;
    slot.store(host.document_name(), &original);

    Ok(ApplyOutcome::Applied {
        occurrences,
        original_bytes: original.len(),
        final_bytes: text.len(),
    })
}

/// Write the slot's snapshot back to the active document verbatim.
///
/// The slot is kept, not cleared: undo is idempotent and repeatable until
/// the next apply overwrites the snapshot. The caller is responsible for
/// pointing `host` at the snapshot's document.
pub fn undo<H: DocumentHost>(host: &mut H, slot: &UndoSlot) -> Result<UndoOutcome> {
    let Some(snapshot) = slot.snapshot() else {
        host.notify("Nothing to undo.");
        return Ok(UndoOutcome::NothingToUndo);
    };

    host.write_document(&snapshot.text)?;
    Ok(UndoOutcome::Restored {
        document: snapshot.document.clone(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use anyhow::bail;

    /// In-memory host: the "document" is an optional string field.
    struct MemoryHost {
        document: Option<String>,
        notices: RefCell<Vec<String>>,
        comparisons: Cell<usize>,
        fail_writes: bool,
    }

    impl MemoryHost {
        fn with_document(text: &str) -> Self {
            Self {
                document: Some(text.to_string()),
                notices: RefCell::new(Vec::new()),
                comparisons: Cell::new(0),
                fail_writes: false,
            }
        }

        fn without_document() -> Self {
            Self {
                document: None,
                notices: RefCell::new(Vec::new()),
                comparisons: Cell::new(0),
                fail_writes: false,
            }
        }
    }

    impl DocumentHost for MemoryHost {
        fn read_document(&self) -> Result<Option<String>> {
            Ok(self.document.clone())
        }

        fn write_document(&mut self, text: &str) -> Result<()> {
            if self.fail_writes {
                bail!("write refused");
            }
            self.document = Some(text.to_string());
            Ok(())
        }

        fn notify(&self, message: &str) {
            self.notices.borrow_mut().push(message.to_string());
        }

        fn show_comparison(&self, _original: &str, _transformed: &str) {
            self.comparisons.set(self.comparisons.get() + 1);
        }

        fn document_name(&self) -> &str {
            "<buffer>"
        }
    }

    fn config(threshold: usize, width: usize) -> CollapseConfig {
        CollapseConfig {
            consecutive_line_threshold: threshold,
            replacement_width: width,
        }
    }

    #[test]
    fn apply_rewrites_document_and_fills_slot() {
        let mut host = MemoryHost::with_document("line1\n\n\n\nline2");
        let mut slot = UndoSlot::empty();

        let outcome = apply(&mut host, &mut slot, &config(3, 2)).unwrap();
        assert_eq!(
            outcome,
            ApplyOutcome::Applied {
                occurrences: 1,
                original_bytes: 15,
                final_bytes: 13,
            }
        );
        assert_eq!(host.document.as_deref(), Some("line1\n\nline2"));
        assert_eq!(slot.snapshot().unwrap().text, "line1\n\n\n\nline2");
    }

    #[test]
    fn apply_without_document_touches_nothing() {
        let mut host = MemoryHost::without_document();
        let mut slot = UndoSlot::empty();

        let outcome = apply(&mut host, &mut slot, &config(3, 2)).unwrap();
        assert_eq!(outcome, ApplyOutcome::NoDocument);
        assert!(slot.is_empty());
    }

    #[test]
    fn failed_write_leaves_slot_untouched() {
        let mut host = MemoryHost::with_document("a\n\n\n\nb");
        host.fail_writes = true;
        let mut slot = UndoSlot::empty();

        let result = apply(&mut host, &mut slot, &config(3, 2));
        assert!(result.is_err());
        assert!(slot.is_empty());
        assert_eq!(host.document.as_deref(), Some("a\n\n\n\nb"));
    }

    #[test]
    fn zero_occurrence_apply_still_overwrites_slot() {
        let mut host = MemoryHost::with_document("clean text");
        let mut slot = UndoSlot::empty();
        slot.store("<buffer>", "stale snapshot");

        let outcome = apply(&mut host, &mut slot, &config(3, 2)).unwrap();
        assert!(matches!(outcome, ApplyOutcome::Applied { occurrences: 0, .. }));
        assert_eq!(slot.snapshot().unwrap().text, "clean text");
    }

    #[test]
    fn undo_restores_exact_pre_apply_text() {
        let original = "a\n\nb\n\n\n\n\nc";
        let mut host = MemoryHost::with_document(original);
        let mut slot = UndoSlot::empty();

        apply(&mut host, &mut slot, &config(3, 2)).unwrap();
        assert_eq!(host.document.as_deref(), Some("a\n\nb\n\nc"));

        let outcome = undo(&mut host, &slot).unwrap();
        assert_eq!(
            outcome,
            UndoOutcome::Restored {
                document: "<buffer>".to_string()
            }
        );
        assert_eq!(host.document.as_deref(), Some(original));
    }

    #[test]
    fn undo_is_repeatable_until_next_apply() {
        let mut host = MemoryHost::with_document("x\n\n\n\ny");
        let mut slot = UndoSlot::empty();
        apply(&mut host, &mut slot, &config(3, 2)).unwrap();

        undo(&mut host, &slot).unwrap();
        let outcome = undo(&mut host, &slot).unwrap();
        assert!(matches!(outcome, UndoOutcome::Restored { .. }));
        assert_eq!(host.document.as_deref(), Some("x\n\n\n\ny"));
    }

    #[test]
    fn undo_with_empty_slot_is_a_no_op() {
        let mut host = MemoryHost::with_document("untouched");
        let slot = UndoSlot::empty();

        let outcome = undo(&mut host, &slot).unwrap();
        assert_eq!(outcome, UndoOutcome::NothingToUndo);
        assert_eq!(host.document.as_deref(), Some("untouched"));
    }

    #[test]
    fn preview_shows_comparison_and_mutates_nothing() {
        let host = MemoryHost::with_document("p\n\n\n\nq");
        let slot = UndoSlot::empty();

        let outcome = preview(&host, &config(3, 2)).unwrap();
        assert_eq!(outcome, PreviewOutcome::Previewed { occurrences: 1 });
        assert_eq!(host.document.as_deref(), Some("p\n\n\n\nq"));
        assert_eq!(host.comparisons.get(), 1);
        assert!(slot.is_empty());
    }

    #[test]
    fn preview_without_document_reports_and_stops() {
        let host = MemoryHost::without_document();
        let outcome = preview(&host, &config(3, 2)).unwrap();
        assert_eq!(outcome, PreviewOutcome::NoDocument);
        assert_eq!(host.notices.borrow().len(), 1);
        assert_eq!(host.comparisons.get(), 0);
    }
}
