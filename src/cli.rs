use std::path::PathBuf;

mod batch;
mod config;
mod extract;
mod render;
mod show;
mod status;
mod terminal;

use clap::ArgAction;
use criteria::ItemKey;
use tracing::instrument;

/// Parse a work-item key from a string, normalizing to uppercase.
///
/// This is a CLI boundary function that accepts lowercase input
/// and normalizes it before parsing.
fn parse_key(s: &str) -> Result<ItemKey, String> {
    // Normalize to uppercase
    let uppercase = s.to_uppercase();
    // Parse using FromStr (strict validation)
    uppercase.parse().map_err(|e| format!("{e}"))
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global=true)]
    verbose: u8,

    /// The path to the root of the workspace
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::Status(status::Command::default()))
            .run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show workspace status (default)
    Status(status::Command),

    /// Initialize a new criteria workspace
    Init,

    /// Render a work item's description to plain text
    Render(render::Command),

    /// Extract acceptance criteria from one work-item payload
    Extract(extract::Command),

    /// Extract every payload in the workspace and write checklists
    Batch(batch::Command),

    /// Display a stored checklist
    Show(show::Command),

    /// Show the effective workspace configuration
    Config(config::Command),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Status(command) => command.run(root)?,
            Self::Init => Init::run(&root)?,
            Self::Render(command) => command.run(root)?,
            Self::Extract(command) => command.run(root)?,
            Self::Batch(command) => command.run(root)?,
            Self::Show(command) => command.run(root)?,
            Self::Config(command) => command.run(root)?,
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Init {}

impl Init {
    #[instrument]
    fn run(root: &PathBuf) -> anyhow::Result<()> {
        use std::fs;

        use criteria::storage::META_DIR;

        // Create .crit directory
        let meta_dir = root.join(META_DIR);
        if meta_dir.exists() {
            anyhow::bail!("Workspace already initialized (found existing .crit directory)");
        }

        fs::create_dir_all(&meta_dir)
            .map_err(|e| anyhow::anyhow!("Failed to create .crit directory: {e}"))?;

        // Create config.toml with defaults
        let config_path = meta_dir.join("config.toml");
        let config = criteria::Config::default();
        config
            .save(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to create config.toml: {e}"))?;

        println!("Initialized criteria workspace in {}", root.display());
        println!("  Created: .crit/config.toml");
        println!();
        println!("Next steps:");
        println!("  Drop work-item exports (*.json) into the workspace");
        println!("  crit extract <file>   # preview one item");
        println!("  crit batch            # write checklists for every item");

        Ok(())
    }
}
