use std::{path::PathBuf, process};

use clap::Parser;
use criteria::{Workspace, storage::Freshness};
use tracing::instrument;

use super::terminal::{Colorize, is_narrow};

#[derive(Debug, Parser, Default)]
#[command(about = "Show work-item counts and checklist freshness")]
pub struct Command {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress headers and format for scripting
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Command {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let workspace = Workspace::open(root);

        let (extractions, failures) = workspace.extract_all();

        // Check if we have an empty workspace
        if extractions.is_empty() && failures.is_empty() {
            println!("No work-item payloads found yet. Drop *.json exports here and run 'crit batch'.");
            return Ok(());
        }

        let mut current = 0_usize;
        let mut stale = 0_usize;
        for extraction in &extractions {
            match workspace.freshness(extraction) {
                Freshness::Current => current += 1,
                Freshness::New | Freshness::Drifted => stale += 1,
            }
        }
        let total = extractions.len();

        match self.output {
            OutputFormat::Json => Self::output_json(total, current, stale, failures.len())?,
            OutputFormat::Table => {
                if self.quiet {
                    println!("{total} {current} {stale} {}", failures.len());
                } else {
                    Self::output_table(total, current, stale, &failures);
                }
            }
        }

        // Exit with a non-zero code when the workspace needs attention.
        let mut exit_code = 0;
        if !failures.is_empty() {
            exit_code = 3;
        }
        if stale > 0 {
            exit_code = exit_code.max(2);
        }

        if exit_code != 0 {
            process::exit(exit_code);
        }

        Ok(())
    }

    fn output_json(
        total: usize,
        current: usize,
        stale: usize,
        failures: usize,
    ) -> anyhow::Result<()> {
        use serde_json::json;

        let output = json!({
            "work_items": total,
            "checklists": {
                "current": current,
                "stale": stale,
            },
            "unreadable_payloads": failures,
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_table(
        total: usize,
        current: usize,
        stale: usize,
        failures: &[(PathBuf, criteria::storage::ExtractionError)],
    ) {
        let label = if is_narrow() { "items" } else { "work items" };
        println!("{total} {label}");
        println!("{}", format!("  ✅ {current} checklists current").success());

        if stale > 0 {
            println!(
                "{}",
                format!("  ⚠️  {stale} need extraction (run 'crit batch')").warning()
            );
        }

        for (path, error) in failures {
            println!(
                "{}",
                format!("  ⚠️  unreadable payload {}: {error}", path.display()).warning()
            );
        }
    }
}
