//! Ingestion: archive decoding, extraction, scoring and deduplication.

pub mod conversation;
pub mod dedupe;
pub mod extractor;
pub mod scoring;

pub use conversation::{Conversation, load_archive, parse_archive};
pub use dedupe::{DEDUPE_KEY_CHARS, Deduplicator, dedupe_key};
pub use extractor::{ExtractedMessage, UNKNOWN_AUTHOR, extract_messages};
pub use scoring::{HeuristicScorer, ImportanceScorer, MAX_SCORE};
