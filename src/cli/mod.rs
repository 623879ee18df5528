//! CLI command implementations.
//!
//! Provides subcommand handlers for:
//! - `squeeze apply <FILE>` — collapse blank-line runs in place
//! - `squeeze preview <FILE>` — before/after comparison, no write
//! - `squeeze undo` — restore the last apply snapshot
//! - `squeeze stats` — history summary (table, json, csv)
//! - `squeeze config show|init|set|reset` — configuration management

use std::collections::BTreeMap;

use anyhow::Result;
use colored::Colorize;

use crate::config;
use crate::engine::{self, ApplyOutcome, PreviewOutcome, UndoOutcome, UndoSlot};
use crate::history::{self, HistoryEntry};
use crate::host::FileHost;

/// Output format for the stats command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// squeeze apply
// ---------------------------------------------------------------------------

/// Collapse blank-line runs in `file` in place and report the count.
pub fn run_apply(file: &str) -> Result<()> {
    let cfg = config::load();
    let mut host = FileHost::new(file, cfg.preview.max_bytes);
    let mut slot = UndoSlot::load();

    match engine::apply(&mut host, &mut slot, &cfg.collapse)? {
        ApplyOutcome::Applied {
            occurrences,
            original_bytes,
            final_bytes,
        } => {
            let _ = slot.persist();
            history::log_apply(&cfg.logging, file, occurrences, original_bytes, final_bytes);

            if occurrences == 0 {
                println!("{}", format!("No blank-line runs to collapse in {file}.").yellow());
            } else {
                let removed = original_bytes.saturating_sub(final_bytes);
                println!(
                    "{}",
                    format!(
                        "Collapsed {occurrences} blank-line run(s) in {file} ({removed} bytes removed)."
                    )
                    .green()
                );
            }
        }
        ApplyOutcome::NoDocument => {}
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// squeeze preview
// ---------------------------------------------------------------------------

/// Show what an apply would do to `file` without writing anything.
pub fn run_preview(file: &str) -> Result<()> {
    let cfg = config::load();
    let host = FileHost::new(file, cfg.preview.max_bytes);

    match engine::preview(&host, &cfg.collapse)? {
        PreviewOutcome::Previewed { occurrences } => {
            println!();
            if occurrences == 0 {
                println!("{}", "No blank-line runs would be collapsed.".yellow());
            } else {
                println!(
                    "{}",
                    format!("{occurrences} blank-line run(s) would be collapsed.").green()
                );
            }
        }
        PreviewOutcome::NoDocument => {}
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// squeeze undo
// ---------------------------------------------------------------------------

/// Restore the document recorded in the undo slot to its pre-apply text.
pub fn run_undo() -> Result<()> {
    let cfg = config::load();
    let slot = UndoSlot::load();

    let Some(snapshot) = slot.snapshot() else {
        println!("{}", "Nothing to undo.".yellow());
        return Ok(());
    };

    let restored_bytes = snapshot.text.len();
    let mut host = FileHost::new(snapshot.document.clone(), cfg.preview.max_bytes);

    match engine::undo(&mut host, &slot)? {
        UndoOutcome::Restored { document } => {
            history::log_undo(&cfg.logging, &document, restored_bytes);
            println!("{}", format!("Restored {document} from the last apply.").green());
        }
        UndoOutcome::NothingToUndo => {}
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// squeeze stats
// ---------------------------------------------------------------------------

/// Aggregate view over the history log.
#[derive(Debug, Default)]
pub struct Stats {
    pub applies: usize,
    pub undos: usize,
    pub total_occurrences: usize,
    pub total_bytes_removed: usize,
    /// Per-document (applies, occurrences), sorted by document name.
    pub documents: BTreeMap<String, (usize, usize)>,
}

/// Compute aggregate stats from history entries.
pub fn compute_stats(entries: &[HistoryEntry]) -> Stats {
    let mut stats = Stats::default();

    for entry in entries {
        match entry.action.as_str() {
            "apply" => {
                stats.applies += 1;
                stats.total_occurrences += entry.occurrences;
                stats.total_bytes_removed += entry.bytes_removed();
                let doc = stats.documents.entry(entry.document.clone()).or_insert((0, 0));
                doc.0 += 1;
                doc.1 += entry.occurrences;
            }
            "undo" => stats.undos += 1,
            _ => {}
        }
    }

    stats
}

/// Show history statistics.
pub fn run_stats(format: OutputFormat, days: Option<u32>) -> Result<()> {
    let cfg = config::load();
    let entries = history::read_entries_since_days(&cfg.logging, days);

    if entries.is_empty() {
        println!(
            "{}",
            "No history yet. Run squeeze apply on a file to record some.".yellow()
        );
        return Ok(());
    }

    let stats = compute_stats(&entries);

    match format {
        OutputFormat::Json => print_stats_json(&stats)?,
        OutputFormat::Csv => print_stats_csv(&stats),
        OutputFormat::Table => print_stats_table(&stats),
    }

    Ok(())
}

fn print_stats_table(stats: &Stats) {
    println!("{}", "Squeeze History".bold().cyan());
    println!("{}", "=".repeat(60));
    println!();
    println!("  {} {}", "Applies:        ".bold(), stats.applies);
    println!("  {} {}", "Undos:          ".bold(), stats.undos);
    println!("  {} {}", "Runs collapsed: ".bold(), stats.total_occurrences);
    println!("  {} {}", "Bytes removed:  ".bold(), stats.total_bytes_removed);

    if !stats.documents.is_empty() {
        println!();
        println!("{}", "Per Document".bold().cyan());
        println!("  {:<40} {:>8} {:>8}", "Document", "Applies", "Runs");
        println!("  {}", "-".repeat(58));
        for (document, (applies, occurrences)) in &stats.documents {
            println!(
                "  {:<40} {:>8} {:>8}",
                truncate(document, 40),
                applies,
                occurrences
            );
        }
    }
}

fn print_stats_json(stats: &Stats) -> Result<()> {
    let value = serde_json::json!({
        "applies": stats.applies,
        "undos": stats.undos,
        "total_occurrences": stats.total_occurrences,
        "total_bytes_removed": stats.total_bytes_removed,
        "documents": stats.documents.iter().map(|(document, (applies, occurrences))| {
            serde_json::json!({
                "document": document,
                "applies": applies,
                "occurrences": occurrences,
            })
        }).collect::<Vec<_>>(),
    });

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn print_stats_csv(stats: &Stats) {
    println!("document,applies,occurrences");
    for (document, (applies, occurrences)) in &stats.documents {
        println!("{document},{applies},{occurrences}");
    }
}

/// Truncate a display string to `max` characters, appending `...`.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let head: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{head}...")
}

// ---------------------------------------------------------------------------
// squeeze config
// ---------------------------------------------------------------------------

/// Print the effective (fully resolved) configuration.
pub fn run_config_show() -> Result<()> {
    print!("{}", config::show_effective_config()?);
    Ok(())
}

/// Write the default annotated config file.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!("{}", format!("Wrote default config to {}.", path.display()).green());
    Ok(())
}

/// Set a single config key in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{}", format!("Set {key} = {value}.").green());
    Ok(())
}

/// Reset the global config file to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!("{}", format!("Reset config at {}.", path.display()).green());
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(action: &str, document: &str, occurrences: usize, before: usize, after: usize) -> HistoryEntry {
        HistoryEntry {
            timestamp: "2026-01-01T00:00:00+00:00".to_string(),
            action: action.to_string(),
            document: document.to_string(),
            occurrences,
            original_bytes: before,
            final_bytes: after,
        }
    }

    #[test]
    fn output_format_parses_known_values() {
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str_opt(Some("csv")), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_str_opt(Some("table")), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
    }

    #[test]
    fn stats_aggregate_applies_and_undos() {
        let entries = vec![
            entry("apply", "a.md", 2, 100, 80),
            entry("apply", "a.md", 1, 80, 75),
            entry("apply", "b.md", 0, 50, 50),
            entry("undo", "a.md", 0, 100, 100),
        ];

        let stats = compute_stats(&entries);
        assert_eq!(stats.applies, 3);
        assert_eq!(stats.undos, 1);
        assert_eq!(stats.total_occurrences, 3);
        assert_eq!(stats.total_bytes_removed, 25);
        assert_eq!(stats.documents["a.md"], (2, 3));
        assert_eq!(stats.documents["b.md"], (1, 0));
    }

    #[test]
    fn truncate_shortens_long_names() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 10), "abcdefghij");
        assert_eq!(truncate("abcdefghijk", 10), "abcdefg...");
    }
}
