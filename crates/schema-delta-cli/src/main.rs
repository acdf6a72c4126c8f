//! schema-delta CLI
//!
//! Diffs two table schema documents and prints the migration operations.

mod load;
mod render;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use schema_delta::prelude::*;

use crate::load::{load_document, load_optional};
use crate::render::{render_down, render_up};

/// Turns two versions of a table schema into migration operations.
#[derive(Parser)]
#[command(name = "schema-delta")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Previous schema document (omit when the table is new).
    #[arg(short, long)]
    from: Option<PathBuf>,

    /// Current schema document.
    #[arg(short, long)]
    to: PathBuf,

    /// Output format.
    #[arg(long, value_enum, env = "SCHEMA_DELTA_FORMAT", default_value = "json")]
    format: Format,

    /// Emit column changes for enumerated columns.
    #[arg(long)]
    emit_enum_changes: bool,

    /// Emit only the type and the added attribute for single-attribute changes.
    #[arg(long)]
    minimal_attribute_changes: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// Pretty-printed JSON array of operations.
    Json,
    /// `queryInterface` migration script with up and down sections.
    Script,
}

impl Cli {
    fn compile_options(&self) -> CompileOptions {
        let mut options = CompileOptions::new();
        if self.emit_enum_changes {
            options = options.with_enum_changes();
        }
        if self.minimal_attribute_changes {
            options = options.with_minimal_attribute_changes();
        }
        options
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let from = load_optional(cli.from.as_deref())?;
    let to = load_document(&cli.to)?;

    let ops = diff_schemas(&from, &to, &cli.compile_options())
        .with_context(|| format!("Failed to diff {}", cli.to.display()))?;
    info!("{} operation(s) detected", ops.len());

    match cli.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&ops)?),
        Format::Script => {
            println!("up:");
            println!("{}", render_up(&ops, 2));
            println!("down:");
            println!("{}", render_down(&ops, 2));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from([
            "schema-delta",
            "--from",
            "old.json",
            "--to",
            "new.json",
            "--format",
            "script",
            "--emit-enum-changes",
        ]);
        assert_eq!(cli.from, Some(PathBuf::from("old.json")));
        assert!(matches!(cli.format, Format::Script));

        let options = cli.compile_options();
        assert!(options.emit_enum_changes);
        assert!(!options.minimal_attribute_changes);
    }

    #[test]
    fn test_cli_from_is_optional() {
        let cli = Cli::parse_from(["schema-delta", "--to", "new.json", "-v"]);
        assert!(cli.from.is_none());
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_rejects_missing_to() {
        assert!(Cli::try_parse_from(["schema-delta", "--from", "old.json"]).is_err());
    }
}
