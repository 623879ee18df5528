/// Configuration schema and defaults.
///
/// Defines the TOML-serializable configuration with its three sections:
/// `[collapse]`, `[preview]`, and `[logging]`. Every field has a built-in
/// default, so users only set the values they want to override.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level configuration.
///
/// Maps directly to the `~/.squeeze/config.toml` and `.squeeze.toml` file
/// schemas. All sections and fields are optional — missing values fall
/// back to built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SqueezeConfig {
    pub collapse: CollapseConfig,
    pub preview: PreviewConfig,
    pub logging: LoggingConfig,
}

impl SqueezeConfig {
    /// Coerce out-of-range values into their valid ranges.
    ///
    /// Applied after all layers are merged, so a bad value in a config
    /// file or environment variable degrades to the nearest valid setting
    /// instead of breaking the transform.
    pub fn sanitize(&mut self) {
        if self.collapse.consecutive_line_threshold < 1 {
            self.collapse.consecutive_line_threshold = 1;
        }
        self.collapse.replacement_width = self.collapse.replacement_width.clamp(1, 2);
        if self.preview.max_bytes == 0 {
            self.preview.max_bytes = PreviewConfig::default().max_bytes;
        }
    }

    /// The default config as an annotated TOML document, written by
    /// `squeeze config init`.
    pub fn default_toml() -> &'static str {
        r#"# squeeze configuration.
# Every key is optional; unset keys use the built-in defaults shown here.

[collapse]
# Minimum number of consecutive blank/whitespace-only line breaks that
# triggers collapsing. Must be at least 1.
consecutive_line_threshold = 3
# Newline characters written in place of a matched run: 2 keeps one blank
# line, 1 removes the gap entirely.
replacement_width = 2

[preview]
# Head-truncation bound (bytes) for each side of the preview comparison.
max_bytes = 2048

[logging]
# Whether apply/undo operations are recorded to the history log.
enabled = true
# Path to the history log. `~` expands to the home directory.
path = "~/.squeeze/history.jsonl"
"#
    }
}

// ---------------------------------------------------------------------------
// [collapse]
// ---------------------------------------------------------------------------

/// Blank-run collapsing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollapseConfig {
    /// Minimum number of consecutive blank/whitespace-only line breaks
    /// that triggers collapsing.
    pub consecutive_line_threshold: usize,
    /// Number of newline characters written in place of a matched run.
    pub replacement_width: usize,
}

impl Default for CollapseConfig {
    fn default() -> Self {
        Self {
            consecutive_line_threshold: 3,
            replacement_width: 2,
        }
    }
}

// ---------------------------------------------------------------------------
// [preview]
// ---------------------------------------------------------------------------

/// Preview rendering settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Head-truncation bound (bytes) for each side of the comparison.
    pub max_bytes: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self { max_bytes: 2048 }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// History logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether apply/undo operations are recorded.
    pub enabled: bool,
    /// Path to the history log file. `~` is expanded to the home directory.
    pub path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.squeeze/history.jsonl".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
