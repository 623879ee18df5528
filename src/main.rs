use anyhow::Result;
use clap::{Parser, Subcommand};

use squeeze::cli::{self, OutputFormat};

#[derive(Debug, Parser)]
#[command(name = "squeeze")]
#[command(about = "Collapse runs of consecutive blank lines in text documents")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Collapse blank-line runs in a file in place
    Apply {
        /// The file to rewrite
        file: String,
    },
    /// Show a before/after comparison without writing anything
    Preview {
        /// The file to inspect
        file: String,
    },
    /// Restore the file touched by the last apply to its previous text
    Undo,
    /// Show history statistics
    Stats {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
        /// Only include the last N days of history
        #[arg(long)]
        days: Option<u32>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the effective (fully resolved) configuration
    Show,
    /// Write the default annotated config to ~/.squeeze/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Set a single config key, e.g. collapse.replacement_width
    Set { key: String, value: String },
    /// Reset the global config to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Apply { file } => cli::run_apply(&file),
        Commands::Preview { file } => cli::run_preview(&file),
        Commands::Undo => cli::run_undo(),
        Commands::Stats { format, days } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_stats(fmt, days)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
