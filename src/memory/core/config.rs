//! Configuration for the import pipeline.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::memory::core::errors::{MemoryError, MemoryResult};
use crate::memory::ingest::scoring::MAX_SCORE;

/// Default importance threshold for the importance-filtered mode.
pub const DEFAULT_MIN_SCORE: u8 = 3;

/// Directory under the user's home holding the memory store.
pub const MEMORY_DIR: &str = ".conch";

/// File name of the default memory store.
pub const DEFAULT_DB_FILE: &str = "default.db";

/// Top-level configuration for one import run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Message selection policy.
    pub selection: SelectionConfig,
    /// Storage settings.
    pub storage: StorageConfig,
}

impl ImportConfig {
    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> MemoryResult<()> {
        if let ImportMode::Important { min_score } = self.selection.mode
            && min_score > MAX_SCORE
        {
            return Err(MemoryError::InvalidConfig(format!(
                "selection.min_score must be <= {MAX_SCORE}, got {min_score}"
            )));
        }

        if self.storage.sqlite_path.as_os_str().is_empty() {
            return Err(MemoryError::InvalidConfig(
                "storage.sqlite_path must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Which import entry point is running.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportMode {
    /// Import every message that passes the role filter.
    #[default]
    Full,
    /// Import only messages scoring at least `min_score`.
    Important {
        /// Minimum importance score to keep a message.
        min_score: u8,
    },
}

impl ImportMode {
    /// Importance-filtered mode with the default threshold.
    #[must_use]
    pub const fn important() -> Self {
        Self::Important {
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

/// Message selection policy.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Import mode and its threshold.
    pub mode: ImportMode,
    /// Also import assistant-authored messages.
    pub include_assistant: bool,
    /// Prefix bodies with `[title] [author]` (always on in importance mode).
    pub prefix_title: bool,
    /// Only process the first N conversations; 0 means all.
    pub max_conversations: usize,
}

impl SelectionConfig {
    /// Create a full-import selection with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the import mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: ImportMode) -> Self {
        self.mode = mode;
        self
    }

    /// Include or exclude assistant messages.
    #[must_use]
    pub const fn with_include_assistant(mut self, include: bool) -> Self {
        self.include_assistant = include;
        self
    }

    /// Enable or disable the title prefix.
    #[must_use]
    pub const fn with_prefix_title(mut self, prefix: bool) -> Self {
        self.prefix_title = prefix;
        self
    }

    /// Cap the number of conversations processed.
    #[must_use]
    pub const fn with_max_conversations(mut self, max: usize) -> Self {
        self.max_conversations = max;
        self
    }

    /// Whether messages by `author` are eligible for import.
    #[must_use]
    pub fn admits_author(&self, author: &str) -> bool {
        match author {
            "user" => true,
            "assistant" => self.include_assistant,
            _ => false,
        }
    }

    /// Whether bodies get the `[title] [author]` prefix.
    #[must_use]
    pub const fn prefixes_title(&self) -> bool {
        match self.mode {
            ImportMode::Full => self.prefix_title,
            ImportMode::Important { .. } => true,
        }
    }
}

/// Storage configuration for the memory store.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// `SQLite` database path.
    pub sqlite_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            sqlite_path: default_db_path(),
        }
    }
}

impl StorageConfig {
    /// Storage settings for an explicit database path (`~` is expanded).
    #[must_use]
    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            sqlite_path: expand_home(path.as_ref()),
        }
    }
}

/// `~/.conch/default.db`, or a relative `.conch/default.db` without a home.
#[must_use]
pub fn default_db_path() -> PathBuf {
    BaseDirs::new().map_or_else(
        || PathBuf::from(MEMORY_DIR).join(DEFAULT_DB_FILE),
        |dirs| dirs.home_dir().join(MEMORY_DIR).join(DEFAULT_DB_FILE),
    )
}

/// Expand a leading `~` to the user's home directory.
#[must_use]
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match BaseDirs::new() {
        Some(dirs) => dirs.home_dir().join(rest),
        None => path.to_path_buf(),
    }
}
