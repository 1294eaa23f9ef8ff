//! Core types shared by the import pipeline.

pub mod config;
pub mod errors;
pub mod kinds;
pub mod timestamps;

pub use config::{
    DEFAULT_MIN_SCORE, ImportConfig, ImportMode, SelectionConfig, StorageConfig, default_db_path,
    expand_home,
};
pub use errors::{MemoryError, MemoryResult};
pub use kinds::{MemoryKind, MemoryKindParseError};
pub use timestamps::{format_iso, is_set, now_iso, to_iso};
