//! Episode memory import pipeline.
//!
//! Organized like the rest of the memory subsystem:
//! - `core`: Configuration, errors, kinds, and timestamp normalization
//! - `ingest`: Archive model, message extraction, importance scoring, deduplication
//! - `storage`: The `SQLite` episode store
//! - `engine`: Orchestration of an import run

pub mod core;
pub mod engine;
pub mod ingest;
pub mod storage;

// Re-export commonly used types for convenience
pub use self::core::{
    ImportConfig, ImportMode, MemoryError, MemoryKind, MemoryResult, SelectionConfig,
    StorageConfig, to_iso,
};
pub use engine::{ImportReport, Importer, import_file};
pub use ingest::{
    Conversation, Deduplicator, ExtractedMessage, HeuristicScorer, ImportanceScorer,
    extract_messages, load_archive, parse_archive,
};
pub use storage::{EpisodeSink, EpisodeStore, EpisodeWriter, ensure_schema};
