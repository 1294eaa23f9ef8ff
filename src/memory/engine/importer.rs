//! Import orchestration: selection policy over a batch of conversations.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::memory::core::config::{ImportConfig, ImportMode, SelectionConfig};
use crate::memory::core::errors::MemoryResult;
use crate::memory::core::timestamps::{is_set, to_iso};
use crate::memory::ingest::conversation::{Conversation, load_archive};
use crate::memory::ingest::dedupe::Deduplicator;
use crate::memory::ingest::extractor::extract_messages;
use crate::memory::ingest::scoring::{HeuristicScorer, ImportanceScorer};
use crate::memory::storage::episode_store::{EpisodeSink, EpisodeStore};

/// Counters produced by one import run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ImportReport {
    /// Conversations processed after the cap.
    pub conversations: usize,
    /// Messages with text whose author passed the role filter.
    pub scanned: usize,
    /// Messages dropped as repeats of an earlier body.
    pub duplicates: usize,
    /// Messages scoring under the threshold (importance mode only).
    pub below_threshold: usize,
    /// Episodes written.
    pub kept: usize,
}

/// Drives extraction, dedupe, scoring and writes for one archive.
pub struct Importer<S = HeuristicScorer> {
    selection: SelectionConfig,
    scorer: S,
}

impl Importer<HeuristicScorer> {
    /// Create an importer with the heuristic scorer.
    ///
    /// # Errors
    /// Returns an error if the scorer's patterns fail to compile.
    pub fn new(selection: SelectionConfig) -> MemoryResult<Self> {
        Ok(Self::with_scorer(selection, HeuristicScorer::new()?))
    }
}

impl<S: ImportanceScorer> Importer<S> {
    /// Create an importer with a custom scoring strategy.
    #[must_use]
    pub const fn with_scorer(selection: SelectionConfig, scorer: S) -> Self {
        Self { selection, scorer }
    }

    /// Selection policy in effect.
    #[must_use]
    pub const fn selection(&self) -> &SelectionConfig {
        &self.selection
    }

    /// Run the pipeline over `conversations`, writing accepted episodes to `sink`.
    ///
    /// Dedupe state lives only for this call.
    ///
    /// # Errors
    /// Returns the first error reported by `sink`; the run stops there.
    pub fn run<W: EpisodeSink>(
        &self,
        conversations: &[Conversation],
        sink: &mut W,
    ) -> MemoryResult<ImportReport> {
        let limit = match self.selection.max_conversations {
            0 => conversations.len(),
            max => max.min(conversations.len()),
        };
        let prefix = self.selection.prefixes_title();
        let mut dedupe = Deduplicator::new();
        let mut report = ImportReport {
            conversations: limit,
            ..ImportReport::default()
        };

        for conversation in &conversations[..limit] {
            let title = conversation.display_title();

            for message in extract_messages(conversation) {
                if !self.selection.admits_author(&message.author) {
                    continue;
                }
                report.scanned += 1;

                if !dedupe.admit(&message.text) {
                    continue;
                }

                if let ImportMode::Important { min_score } = self.selection.mode {
                    let score = self.scorer.score(&message.text);
                    if score < min_score {
                        debug!(score, min_score, title, "message below importance threshold");
                        report.below_threshold += 1;
                        continue;
                    }
                }

                let created_at = to_iso(
                    message
                        .create_time
                        .as_ref()
                        .filter(|value| is_set(value))
                        .or(conversation.create_time.as_ref()),
                );
                let body = if prefix {
                    format!("[{title}] [{}] {}", message.author, message.text)
                } else {
                    message.text
                };

                sink.insert_episode(&body, &created_at)?;
                report.kept += 1;
            }
        }

        report.duplicates = dedupe.rejected();
        Ok(report)
    }
}

/// Import one archive file into the store named by `config`.
///
/// The archive is parsed before the store is touched; every insert of the run
/// commits together or not at all.
///
/// # Errors
/// Returns an error for invalid configuration, an unreadable or malformed
/// archive, or any storage failure.
pub fn import_file(input: &Path, config: &ImportConfig) -> MemoryResult<ImportReport> {
    config.validate()?;
    let conversations = load_archive(input)?;
    let importer = Importer::new(config.selection.clone())?;

    let mut store = EpisodeStore::open(&config.storage)?;
    store.ensure_schema()?;

    let mut writer = store.begin()?;
    let report = importer.run(&conversations, &mut writer)?;
    writer.commit()?;

    let pending = store.count_missing_embeddings()?;
    info!(
        input = %input.display(),
        db = %config.storage.sqlite_path.display(),
        conversations = report.conversations,
        scanned = report.scanned,
        duplicates = report.duplicates,
        below_threshold = report.below_threshold,
        kept = report.kept,
        pending_embeddings = pending,
        "import finished"
    );
    Ok(report)
}
