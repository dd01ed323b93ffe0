use std::path::PathBuf;

use criteria::{
    Workspace,
    storage::{Extraction, ExtractionError, Freshness},
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, clap::Parser)]
#[command(about = "Extract every payload in the workspace and write checklists")]
pub struct Command {
    /// Check for stale checklists without making changes (exits with
    /// code 2 if any are found)
    #[arg(long)]
    check: bool,

    /// Show what would be written without making changes
    #[arg(long)]
    dry_run: bool,

    /// Skip confirmation prompts
    #[arg(long, short)]
    yes: bool,

    /// Suppress output
    #[arg(long, short)]
    quiet: bool,
}

impl Command {
    #[instrument]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let workspace = Workspace::open(root);

        let (extractions, failures) = workspace.extract_all();

        if !self.quiet {
            for (path, error) in &failures {
                eprintln!(
                    "{}",
                    format!("⚠️  Skipping {}: {error}", path.display()).warning()
                );
            }
        }

        // Only checklists that are missing or out of date get rewritten.
        let stale: Vec<Extraction> = extractions
            .into_iter()
            .filter(|extraction| workspace.freshness(extraction) != Freshness::Current)
            .collect();

        if self.check {
            self.report_check(&stale, failures.len());
            return Ok(());
        }

        if stale.is_empty() {
            if !self.quiet {
                println!("{}", "✅ All checklists are current.".success());
            }
            return Self::finish(&failures);
        }

        if self.dry_run {
            if !self.quiet {
                println!("Would write {} checklists:", stale.len());
                for extraction in &stale {
                    println!(
                        "  • {} → {}",
                        extraction.checklist().key(),
                        extraction.target().display()
                    );
                }
            }
            return Self::finish(&failures);
        }

        // Confirm before writing files
        if !self.yes {
            use std::io::{self, BufRead};

            println!("Will write {} checklists:", stale.len());
            for extraction in &stale {
                println!(
                    "  • {} → {}",
                    extraction.checklist().key(),
                    extraction.target().display()
                );
            }

            eprint!("\nProceed? (y/N) ");
            let stdin = io::stdin();
            let mut line = String::new();
            stdin.lock().read_line(&mut line)?;
            if !line.trim().eq_ignore_ascii_case("y") {
                println!("Cancelled");
                std::process::exit(130);
            }
        }

        let written = workspace.write_checklists(&stale)?;

        if !self.quiet {
            println!(
                "{}",
                format!("✅ Wrote {} checklists", written.len()).success()
            );
        }

        Self::finish(&failures)
    }

    fn report_check(&self, stale: &[Extraction], failure_count: usize) {
        let needs_attention = !stale.is_empty() || failure_count > 0;

        if !self.quiet {
            if stale.is_empty() {
                println!("{}", "✅ All checklists are current.".success());
            } else {
                println!(
                    "{}",
                    format!("⚠️  {} checklists are missing or stale", stale.len()).warning()
                );
                for extraction in stale {
                    println!("  • {}", extraction.checklist().key());
                }
            }
        }

        if needs_attention {
            std::process::exit(2);
        }
    }

    fn finish(failures: &[(PathBuf, ExtractionError)]) -> anyhow::Result<()> {
        if failures.is_empty() {
            Ok(())
        } else {
            anyhow::bail!("failed to extract {} payloads", failures.len())
        }
    }
}
