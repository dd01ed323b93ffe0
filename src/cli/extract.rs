use std::{path::PathBuf, process};

use anyhow::Context;
use criteria::{Criterion, Workspace};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, clap::Parser)]
#[command(about = "Extract acceptance criteria from one work-item payload")]
pub struct Command {
    /// The work-item payload file
    file: PathBuf,

    /// Output format (table, json, ndjson)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    format: OutputFormat,

    /// Also write the checklist markdown next to the payload
    #[arg(long, short)]
    write: bool,

    /// Quiet mode: suppress decorations
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
    Ndjson,
}

impl Command {
    #[instrument]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let workspace = Workspace::open(root);

        let extraction = workspace
            .extract_item(&self.file)
            .with_context(|| format!("failed to extract {}", self.file.display()))?;

        let checklist = extraction.checklist();

        match self.format {
            OutputFormat::Table => self.output_table(checklist.criteria()),
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(checklist.criteria())?);
            }
            OutputFormat::Ndjson => {
                for criterion in checklist.criteria() {
                    println!("{}", serde_json::to_string(criterion)?);
                }
            }
        }

        if self.write {
            let target = extraction.target();
            checklist
                .save_to_path(&target)
                .with_context(|| format!("failed to write {}", target.display()))?;
            if !self.quiet {
                println!("{}", format!("✅ Wrote {}", target.display()).success());
            }
        }

        // Absence of criteria is a valid outcome of the pipeline, but the
        // caller deserves a distinct signal for it.
        if checklist.criteria().is_empty() {
            if !self.quiet {
                eprintln!(
                    "{}",
                    format!("⚠️  No acceptance criteria could be derived for {}", checklist.key())
                        .warning()
                );
            }
            process::exit(3);
        }

        Ok(())
    }

    fn output_table(&self, criteria: &[Criterion]) {
        for criterion in criteria {
            let status = match criterion.status() {
                criteria::CriterionStatus::Pending => criterion.status().to_string().dim(),
                criteria::CriterionStatus::InProgress => criterion.status().to_string().warning(),
                criteria::CriterionStatus::Completed => criterion.status().to_string().success(),
            };

            let mut lines = criterion.criterion().lines();
            if let Some(first) = lines.next() {
                println!("{}  {status}  {first}", criterion.id().info());
            }
            for continuation in lines {
                println!("{continuation}");
            }
            if !self.quiet {
                for case in criterion.test_cases() {
                    println!("{}", format!("  • {case}").dim());
                }
            }
        }
    }
}
