//! Import every user (and optionally assistant) message of a conversation
//! archive as an episode.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use conch_import::logging::init_tracing;
use conch_import::memory::MemoryError;
use conch_import::memory::core::{default_db_path, expand_home};
use conch_import::{ImportConfig, ImportMode, SelectionConfig, StorageConfig, import_file};

#[derive(Parser, Debug)]
#[command(
    name = "conch-import",
    version,
    about = "Import OpenClaw/ChatGPT-style conversations.json into Conch as episodes"
)]
struct Args {
    /// Path to conversations.json
    #[arg(long)]
    input: PathBuf,

    /// Conch sqlite path
    #[arg(long, default_value_os_t = default_db_path())]
    db: PathBuf,

    /// Only import the first N conversations (0 = all)
    #[arg(long, default_value_t = 0)]
    max_conversations: usize,

    /// Include assistant messages (default: user only)
    #[arg(long)]
    include_assistant: bool,

    /// Prefix episodes with conversation title
    #[arg(long)]
    prefix_title: bool,
}

fn run(args: &Args) -> Result<()> {
    let config = ImportConfig {
        selection: SelectionConfig::new()
            .with_mode(ImportMode::Full)
            .with_include_assistant(args.include_assistant)
            .with_prefix_title(args.prefix_title)
            .with_max_conversations(args.max_conversations),
        storage: StorageConfig::at(&args.db),
    };
    let input = expand_home(&args.input);

    let report = import_file(&input, &config)
        .inspect_err(warn_rolled_back)
        .with_context(|| format!("failed to import {}", input.display()))?;

    println!(
        "Imported {} episodes into {}",
        report.kept,
        config.storage.sqlite_path.display()
    );
    println!("Next: run `conch embed` to generate embeddings for imported memories.");
    Ok(())
}

fn warn_rolled_back(err: &MemoryError) {
    if err.is_storage() {
        tracing::warn!("storage failure, no episodes from this run were committed");
    }
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::from(1)
        }
    }
}
