//! Blank-line collapsing — the core text transform.
//!
//! A *blank-run* is a maximal contiguous sequence of newline characters,
//! each optionally followed by horizontal whitespace (spaces/tabs), with no
//! other content in between. Runs of at least `threshold` line breaks are
//! replaced by a fixed number of newline characters:
//!
//! - `replacement_width = 2` leaves exactly one visually blank line between
//!   the surrounding content
//! - `replacement_width = 1` removes the gap entirely, making the content
//!   lines adjacent

use regex::Regex;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Result of one collapse pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapseResult {
    /// The rewritten text. Equals the input when `occurrences` is 0.
    pub text: String,
    /// Number of blank-runs replaced, counted left to right.
    pub occurrences: usize,
}

/// Compile the blank-run pattern for a given threshold.
///
/// Matches `threshold` or more consecutive repetitions of a newline
/// optionally followed by spaces/tabs. Greedy repetition makes every match
/// a maximal run: the character after a match is never part of a longer
/// run. Only ASCII `\n` counts as a line break — `\r` is not part of a
/// run, so CRLF documents pass through untouched.
pub fn blank_run_pattern(threshold: usize) -> Regex {
    let threshold = threshold.max(1);
    Regex::new(&format!(r"(?:\n[ \t]*){{{threshold},}}"))
        .expect("blank-run pattern must compile")
}

/// Collapse runs of `threshold` or more consecutive blank/whitespace-only
/// line breaks down to `replacement_width` newline characters.
///
/// The input is borrowed, never mutated; the returned text is a fresh
/// string. Matches are consumed left to right without overlap — after one
/// run is replaced, scanning resumes immediately after it. Pure and total:
/// degenerate parameters are floored at 1 instead of failing, and any
/// string input produces a result.
pub fn collapse(text: &str, threshold: usize, replacement_width: usize) -> CollapseResult {
    let pattern = blank_run_pattern(threshold);
    let width = replacement_width.max(1);

    let mut out = String::with_capacity(text.len());
    let mut occurrences = 0;
    let mut tail = 0;

    for run in pattern.find_iter(text) {
        out.push_str(&text[tail..run.start()]);
        for _ in 0..width {
            out.push('\n');
        }
        occurrences += 1;
        tail = run.end();
    }

    if occurrences == 0 {
        return CollapseResult {
            text: text.to_string(),
            occurrences: 0,
        };
    }

    out.push_str(&text[tail..]);
    CollapseResult { text: out, occurrences }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
