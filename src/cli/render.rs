use std::path::PathBuf;

use anyhow::Context;
use criteria::{DocNode, Workspace, WorkItem, render};
use tracing::instrument;

#[derive(Debug, clap::Parser)]
#[command(about = "Render a work item's description to plain text")]
pub struct Command {
    /// The work-item payload file, or a bare document tree
    file: PathBuf,
}

impl Command {
    #[instrument]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let workspace = Workspace::open(root);
        let max_depth = workspace.config().max_render_depth();

        let content = std::fs::read_to_string(&self.file)
            .with_context(|| format!("failed to read {}", self.file.display()))?;

        let document = parse_document(&content)
            .with_context(|| format!("{} is not a work-item payload", self.file.display()))?;

        match document {
            Some(root) => println!("{}", render::render_with_depth(&root, max_depth)),
            None => tracing::warn!("work item has no description"),
        }

        Ok(())
    }
}

/// Accepts either a full work-item payload or a bare document tree.
fn parse_document(content: &str) -> anyhow::Result<Option<DocNode>> {
    if let Ok(item) = serde_json::from_str::<WorkItem>(content) {
        return Ok(item.description().cloned());
    }

    let node = serde_json::from_str::<DocNode>(content)?;
    Ok(Some(node))
}
