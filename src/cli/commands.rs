use crate::config::release_entries;
use crate::core::{interfaces::*, services::TsumuBuildService};
use crate::infrastructure::{ConsoleReporter, OxcBundler, OxcMinifier, TokioFileSystemService};
use crate::utils::{Logger, Result, TsumuError};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "tsumu")]
#[command(about = "tsumu - sequential multi-entry distribution builder")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build every configured distribution artifact
    Build {
        /// Project root directory
        #[arg(short, long, default_value = ".")]
        root: String,
    },
    /// List the configured build entries
    List {
        /// Project root directory
        #[arg(short, long, default_value = ".")]
        root: String,
        /// Dump the entry table as JSON
        #[arg(long)]
        json: bool,
    },
}

pub struct CliHandler;

impl CliHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn run(&self) -> Result<()> {
        // Initialize logging
        Logger::init();

        let cli = Cli::parse();

        match cli.command {
            Commands::Build { root } => self.handle_build_command(&root).await,
            Commands::List { root, json } => self.handle_list_command(&root, json),
        }
    }

    async fn handle_build_command(&self, root: &str) -> Result<()> {
        let entries = release_entries(&PathBuf::from(root));

        let bundler: Arc<dyn Bundler> = Arc::new(OxcBundler::new());
        let minifier: Arc<dyn Minifier> = Arc::new(OxcMinifier::new());
        let fs_service: Arc<dyn FileSystemService> = Arc::new(TokioFileSystemService);
        let reporter: Arc<dyn Reporter> = Arc::new(ConsoleReporter::new());

        let build_service = TsumuBuildService::new(bundler, minifier, fs_service, reporter);
        let report = build_service.build_all(&entries).await?;

        // A failed entry never aborts the queue, but the process still
        // reports the aggregate outcome
        if report.has_failures() {
            return Err(TsumuError::Other(format!(
                "{} of {} entries failed",
                report.failed(),
                report.outcomes.len()
            )));
        }

        Ok(())
    }

    fn handle_list_command(&self, root: &str, json: bool) -> Result<()> {
        let entries = release_entries(&PathBuf::from(root));

        if json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }

        for entry in &entries {
            Logger::info(&format!(
                "{} → {} ({})",
                entry.input.entry.display(),
                entry.output.file.display(),
                entry.output.format,
            ));
        }
        Logger::info(&format!("{} entries configured", entries.len()));

        Ok(())
    }
}

impl Default for CliHandler {
    fn default() -> Self {
        Self::new()
    }
}
