//! File-based host adapter for the CLI.
//!
//! Implements [`DocumentHost`] over a file path: the "active document" is
//! the target file (a missing file means no document is active),
//! notifications go to stderr, and the before/after comparison is rendered
//! to the terminal, head-truncated to a configurable byte bound.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::engine::DocumentHost;

// ---------------------------------------------------------------------------
// FileHost
// ---------------------------------------------------------------------------

pub struct FileHost {
    path: PathBuf,
    display_name: String,
    preview_max_bytes: usize,
}

impl FileHost {
    pub fn new(path: impl Into<PathBuf>, preview_max_bytes: usize) -> Self {
        let path = path.into();
        let display_name = path.display().to_string();
        Self {
            path,
            display_name,
            preview_max_bytes,
        }
    }
}

impl DocumentHost for FileHost {
    fn read_document(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.display_name))?;
        Ok(Some(text))
    }

    fn write_document(&mut self, text: &str) -> Result<()> {
        fs::write(&self.path, text)
            .with_context(|| format!("failed to write {}", self.display_name))
    }

    fn notify(&self, message: &str) {
        eprintln!("{}", message.yellow());
    }

    fn show_comparison(&self, original: &str, transformed: &str) {
        print_comparison(original, transformed, self.preview_max_bytes);
    }

    fn document_name(&self) -> &str {
        &self.display_name
    }
}

// ---------------------------------------------------------------------------
// Comparison rendering
// ---------------------------------------------------------------------------

/// Render a head-truncated before/after comparison to stdout.
fn print_comparison(original: &str, transformed: &str, max_bytes: usize) {
    println!("{}", "Before".bold().cyan());
    println!("{}", "-".repeat(60));
    print_excerpt(original, max_bytes);
    println!();
    println!("{}", "After".bold().cyan());
    println!("{}", "-".repeat(60));
    print_excerpt(transformed, max_bytes);
}

fn print_excerpt(text: &str, max_bytes: usize) {
    let (head, truncated) = truncate_at_boundary(text, max_bytes);
    print!("{head}");
    if !head.ends_with('\n') {
        println!();
    }
    if truncated {
        let remaining = text.len() - head.len();
        println!("{}", format!("... ({remaining} more bytes)").dimmed());
    }
}

/// Cut `text` at `max_bytes`, backing up to the nearest char boundary.
fn truncate_at_boundary(text: &str, max_bytes: usize) -> (&str, bool) {
    if text.len() <= max_bytes {
        return (text, false);
    }
    let mut cut = max_bytes;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    (&text[..cut], true)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_not_truncated() {
        assert_eq!(truncate_at_boundary("hello", 10), ("hello", false));
    }

    #[test]
    fn long_text_is_cut_at_the_bound() {
        let (head, truncated) = truncate_at_boundary("abcdefgh", 4);
        assert_eq!(head, "abcd");
        assert!(truncated);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // 'é' is two bytes; cutting at 3 would split it.
        let (head, truncated) = truncate_at_boundary("aéb", 2);
        assert_eq!(head, "a");
        assert!(truncated);

        let (head, truncated) = truncate_at_boundary("aéb", 3);
        assert_eq!(head, "aé");
        assert!(truncated);
    }

    #[test]
    fn missing_file_means_no_active_document() {
        let host = FileHost::new("/nonexistent/squeeze-test-document.md", 2048);
        assert!(host.read_document().unwrap().is_none());
    }
}
