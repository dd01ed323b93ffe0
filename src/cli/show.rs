use std::{path::PathBuf, process};

use anyhow::Context;
use criteria::{Checklist, CriterionStatus, ItemKey, Workspace};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, clap::Parser)]
#[command(about = "Display a stored checklist")]
pub struct Command {
    /// The work-item key of the checklist to display
    #[clap(value_parser = super::parse_key)]
    key: ItemKey,

    /// Output format (pretty, json, markdown)
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
    Markdown,
}

impl Command {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let workspace = Workspace::open(root);

        let Some(path) = workspace.find_checklist(&self.key) else {
            eprintln!("No checklist found for {}", self.key);
            process::exit(1);
        };

        let checklist = Checklist::load(&path)
            .with_context(|| format!("failed to load {}", path.display()))?;

        match self.output {
            OutputFormat::Pretty => Self::output_pretty(&checklist, &path),
            OutputFormat::Json => Self::output_json(&checklist)?,
            OutputFormat::Markdown => Self::output_markdown(&path)?,
        }

        Ok(())
    }

    fn output_pretty(checklist: &Checklist, path: &std::path::Path) {
        // Header
        println!("# {}", checklist.key());
        if !checklist.title().is_empty() {
            println!("{}", checklist.title());
        }
        println!();

        println!("{}", "Metadata".dim());
        println!("  Extracted: {}", checklist.extracted());
        println!("  Path:      {}", path.display());

        if checklist.criteria().is_empty() {
            println!("\n{}", "No acceptance criteria were derived.".warning());
            return;
        }

        println!("\n{}", "Criteria".dim());
        for criterion in checklist.criteria() {
            let symbol = match criterion.status() {
                CriterionStatus::Pending => "○".to_string(),
                CriterionStatus::InProgress => "◐".warning(),
                CriterionStatus::Completed => "●".success(),
            };

            let mut lines = criterion.criterion().lines();
            if let Some(first) = lines.next() {
                println!("  {symbol} {} {first}", criterion.id().info());
            }
            for continuation in lines {
                println!("      {continuation}");
            }
            for case in criterion.test_cases() {
                println!("{}", format!("      • {case}").dim());
            }
        }
    }

    fn output_json(checklist: &Checklist) -> anyhow::Result<()> {
        use serde_json::json;

        let output = json!({
            "key": checklist.key().to_string(),
            "title": checklist.title(),
            "extracted": checklist.extracted(),
            "fingerprint": checklist.fingerprint(),
            "criteria": checklist.criteria(),
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_markdown(path: &std::path::Path) -> anyhow::Result<()> {
        // The stored file *is* the markdown representation.
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        print!("{content}");
        Ok(())
    }
}
