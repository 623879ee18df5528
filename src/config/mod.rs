/// Configuration system.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults** — hardcoded in [`schema::SqueezeConfig::default()`]
/// 2. **User global config** — `~/.squeeze/config.toml`
/// 3. **Project local config** — `.squeeze.toml` in the current working directory
/// 4. **Environment variables** — `SQUEEZE_*` overrides (highest precedence)
///
/// Later layers override earlier ones. After merging, out-of-range values
/// are coerced into their valid ranges ([`schema::SqueezeConfig::sanitize`]),
/// so a bad threshold or width from a file or the environment can never
/// reach the transform.
pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub use schema::SqueezeConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars, then sanitizes. This is the entry point for every command.
pub fn load() -> SqueezeConfig {
    let mut config = SqueezeConfig::default();

    // Layer 2: user global config (~/.squeeze/config.toml)
    if let Some(global) = load_toml_file(global_config_path()) {
        config = global;
    }

    // Layer 3: project local config (.squeeze.toml)
    if let Some(project) = load_toml_file(project_config_path()) {
        config = project;
    }

    // Layer 4: environment variable overrides
    apply_env_overrides(&mut config);

    config.sanitize();
    config
}

/// Load a TOML config file from the given path (if it exists).
///
/// Returns `None` if the path is `None`, the file doesn't exist, or the
/// content is malformed. A malformed file is silently ignored — the
/// previous layer's values stay in effect.
fn load_toml_file(path: Option<PathBuf>) -> Option<SqueezeConfig> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    toml::from_str(&content).ok()
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.squeeze/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".squeeze").join("config.toml"))
}

/// Path to the project local config: `.squeeze.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".squeeze.toml"))
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `SQUEEZE_THRESHOLD` — consecutive line threshold (integer)
/// - `SQUEEZE_WIDTH` — replacement width (integer)
/// - `SQUEEZE_LOG` — history logging enabled (`1`/`true`/`yes`/`on`)
///
/// Unparseable values are ignored; out-of-range values are handled by the
/// sanitize pass that follows.
fn apply_env_overrides(config: &mut SqueezeConfig) {
    if let Ok(val) = std::env::var("SQUEEZE_THRESHOLD")
        && let Ok(n) = val.parse::<usize>()
    {
        config.collapse.consecutive_line_threshold = n;
    }
    if let Ok(val) = std::env::var("SQUEEZE_WIDTH")
        && let Ok(n) = val.parse::<usize>()
    {
        config.collapse.replacement_width = n;
    }
    if let Ok(val) = std::env::var("SQUEEZE_LOG") {
        config.logging.enabled = is_truthy(&val);
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset / show
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.squeeze/config.toml`.
///
/// Creates the `~/.squeeze/` directory if it doesn't exist. Returns an
/// error if the file already exists (use `force = true` to overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.squeeze/ directory")?;
    }

    fs::write(&path, SqueezeConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key to a value in the global config file.
///
/// Validates the value first (`collapse.*` keys have numeric ranges — an
/// invalid value is rejected before anything is written), then surgically
/// updates the key in the existing file, or in a freshly serialized
/// default config if none exists. Supports dotted keys like
/// `collapse.replacement_width`.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    validate_value(key, value)?;

    let path = global_config_path().context("could not determine home directory")?;

    let content = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&SqueezeConfig::default())
            .context("failed to serialize default config")?
    };

    let mut root: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML")?;
    set_toml_value(&mut root, key, value)?;

    let output = toml::to_string_pretty(&root).context("failed to serialize config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Reject values that would put a collapse setting out of range.
///
/// Other keys are left to the type-directed parsing in [`set_toml_value`].
fn validate_value(key: &str, value: &str) -> Result<()> {
    match key {
        "collapse.consecutive_line_threshold" => {
            let n: usize = value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{value}'"))?;
            if n < 1 {
                anyhow::bail!("consecutive_line_threshold must be at least 1");
            }
        }
        "collapse.replacement_width" => {
            let n: usize = value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{value}'"))?;
            if !(1..=2).contains(&n) {
                anyhow::bail!("replacement_width must be 1 or 2");
            }
        }
        _ => {}
    }
    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
///
/// The new value is parsed according to the type of the existing value at
/// that key, so `"2"` becomes an integer where an integer lives.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let Some((section_path, leaf)) = key.rsplit_once('.') else {
        anyhow::bail!("config keys are dotted, e.g. collapse.replacement_width");
    };

    let mut current = root;
    for part in section_path.split('.') {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let table = current
        .as_table_mut()
        .with_context(|| format!("expected table at '{section_path}'"))?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        _ => toml::Value::String(raw_value.to_string()),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
