//! Persistent storage for imported episodes.

pub mod episode_store;

pub use episode_store::{EpisodeSink, EpisodeStore, EpisodeWriter, MEMORY_TABLE, ensure_schema};
