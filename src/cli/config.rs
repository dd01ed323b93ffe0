use std::path::PathBuf;

use criteria::{Workspace, storage::META_DIR};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, clap::Parser)]
#[command(about = "Show the effective workspace configuration")]
pub struct Command {
    /// Print the path of the configuration file instead of its contents
    #[arg(long)]
    path: bool,
}

impl Command {
    #[instrument]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let config_path = root.join(META_DIR).join("config.toml");

        if self.path {
            println!("{}", config_path.display());
            return Ok(());
        }

        if !config_path.exists() {
            eprintln!(
                "{}",
                "Using defaults (no .crit/config.toml found; run 'crit init')".dim()
            );
        }

        let workspace = Workspace::open(root);
        print!("{}", toml::to_string_pretty(workspace.config())?);

        Ok(())
    }
}
