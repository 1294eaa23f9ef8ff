//! Conversation archive model.
//!
//! Exports are a JSON array of conversations, each holding a `mapping` of
//! node id to node. Node shapes vary between product versions, so every field
//! below the top-level array decodes leniently: a field with an unexpected
//! shape becomes its default instead of failing the whole archive.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::memory::core::errors::{MemoryError, MemoryResult};

/// Title used when a conversation has none.
pub const UNTITLED: &str = "untitled";

/// One exported conversation.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Conversation {
    /// Conversation title.
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    /// Conversation creation time, raw epoch seconds.
    #[serde(default)]
    pub create_time: Option<Value>,
    /// Nodes keyed by opaque node id.
    #[serde(default, deserialize_with = "lenient")]
    pub mapping: BTreeMap<String, Value>,
}

impl Conversation {
    /// Decode one archive element; anything that is not an object is empty.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        serde_json::from_value(value).unwrap_or_default()
    }

    /// Trimmed title, `untitled` when missing or empty.
    #[must_use]
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title.trim(),
            _ => UNTITLED,
        }
    }

    /// Decoded nodes, in mapping order. Undecodable nodes are skipped.
    pub fn nodes(&self) -> impl Iterator<Item = Node> + '_ {
        self.mapping
            .values()
            .filter_map(|value| Node::deserialize(value).ok())
    }
}

/// A node of the conversation graph.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Node {
    /// Message carried by the node, if any.
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<Message>,
}

/// A single chat message.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Message {
    /// Message author.
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<Author>,
    /// Message content.
    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<Content>,
    /// Message creation time, raw epoch seconds.
    #[serde(default)]
    pub create_time: Option<Value>,
}

/// Message author.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Author {
    /// Author role (`user`, `assistant`, `system`, ...).
    #[serde(default, deserialize_with = "lenient")]
    pub role: Option<String>,
}

/// Message content.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Content {
    /// Ordered content parts: strings or objects with a `text` field.
    #[serde(default, deserialize_with = "lenient")]
    pub parts: Vec<Value>,
}

/// Text carried by a single content part, if it has any.
#[must_use]
pub fn part_text(part: &Value) -> Option<&str> {
    match part {
        Value::String(text) => Some(text),
        Value::Object(fields) => fields.get("text").and_then(Value::as_str),
        _ => None,
    }
}

/// Parse an archive document.
///
/// # Errors
/// Returns an error if the document is not JSON or its top level is not an array.
pub fn parse_archive(json: &str) -> MemoryResult<Vec<Conversation>> {
    let document: Value = serde_json::from_str(json)?;
    let Value::Array(items) = document else {
        return Err(MemoryError::InvalidArchive(
            "expected top-level JSON array of conversations".to_string(),
        ));
    };
    debug!(conversations = items.len(), "parsed conversation archive");
    Ok(items.into_iter().map(Conversation::from_value).collect())
}

/// Read and parse an archive file.
///
/// # Errors
/// Returns an error if the file cannot be read or is not a valid archive.
pub fn load_archive(path: &Path) -> MemoryResult<Vec<Conversation>> {
    let json = fs::read_to_string(path)?;
    parse_archive(&json)
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}
