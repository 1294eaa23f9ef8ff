//! Import only the messages of a conversation archive that score as important.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use conch_import::logging::init_tracing;
use conch_import::memory::MemoryError;
use conch_import::memory::core::{DEFAULT_MIN_SCORE, default_db_path, expand_home};
use conch_import::{ImportConfig, ImportMode, SelectionConfig, StorageConfig, import_file};

#[derive(Parser, Debug)]
#[command(
    name = "conch-import-important",
    version,
    about = "Import important items from OpenClaw/ChatGPT conversations.json into Conch"
)]
struct Args {
    /// Path to conversations.json
    #[arg(long)]
    input: PathBuf,

    /// Conch DB path
    #[arg(long, default_value_os_t = default_db_path())]
    db: PathBuf,

    /// Importance threshold
    #[arg(long, default_value_t = DEFAULT_MIN_SCORE)]
    min_score: u8,

    /// Include assistant messages
    #[arg(long)]
    include_assistant: bool,

    /// Only scan the first N conversations (0 = all)
    #[arg(long, default_value_t = 0)]
    max_conversations: usize,
}

fn run(args: &Args) -> Result<()> {
    let config = ImportConfig {
        selection: SelectionConfig::new()
            .with_mode(ImportMode::Important {
                min_score: args.min_score,
            })
            .with_include_assistant(args.include_assistant)
            .with_max_conversations(args.max_conversations),
        storage: StorageConfig::at(&args.db),
    };
    let input = expand_home(&args.input);

    let report = import_file(&input, &config)
        .inspect_err(warn_rolled_back)
        .with_context(|| format!("failed to import {}", input.display()))?;

    println!(
        "Scanned {} messages, imported {} important episodes.",
        report.scanned, report.kept
    );
    println!("Next: run `conch embed` to generate embeddings.");
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
