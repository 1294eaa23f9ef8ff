//! Message extraction from a conversation's node mapping.

use serde_json::Value;

use crate::memory::ingest::conversation::{Conversation, Message, part_text};

/// Author used when a message carries no role.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// A normalized message ready for selection.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractedMessage {
    /// Trimmed author role.
    pub author: String,
    /// Non-empty, trimmed text.
    pub text: String,
    /// Raw message-level creation time.
    pub create_time: Option<Value>,
}

/// Yield every message in `conversation` that carries text.
///
/// Nodes are visited in mapping order; no parent/child structure is followed.
pub fn extract_messages(
    conversation: &Conversation,
) -> impl Iterator<Item = ExtractedMessage> + '_ {
    conversation
        .nodes()
        .filter_map(|node| node.message)
        .filter_map(normalize_message)
}

fn normalize_message(message: Message) -> Option<ExtractedMessage> {
    let text = message_text(&message)?;
    let author = message
        .author
        .and_then(|author| author.role)
        .filter(|role| !role.is_empty())
        .map_or_else(|| UNKNOWN_AUTHOR.to_string(), |role| role.trim().to_string());

    Some(ExtractedMessage {
        author,
        text,
        create_time: message.create_time,
    })
}

/// Join the message's non-empty parts with newlines.
///
/// Returns `None` when no part has text.
#[must_use]
pub fn message_text(message: &Message) -> Option<String> {
    let parts: Vec<&str> = message
        .content
        .iter()
        .flat_map(|content| content.parts.iter())
        .filter_map(part_text)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        return None;
    }
    Some(parts.join("\n").trim().to_string())
}
