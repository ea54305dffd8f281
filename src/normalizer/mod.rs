//! Conversation normalizer.
//!
//! Turns one parsed JSON document of unknown shape into canonical
//! [`Conversation`] records. Field names are resolved through the candidate
//! tables in [`fields`]; missing fields fall back to defaults and never
//! produce an error.

pub mod fields;
pub mod timestamp;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::models::{Conversation, Message, Role};
use fields::{
    resolve, scalar_text, CONTENT_FIELDS, CONVERSATION_CONTAINERS, CREATED_AT_FIELDS, ID_FIELDS,
    MESSAGES_FIELDS, ROLE_FIELDS, TEXT_BLOCK_TYPES, TIMESTAMP_FIELDS, TITLE_FIELDS,
};

/// How an id is synthesized for a conversation that carries none.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FallbackIdStrategy {
    /// `conv_<index>_<12 hex chars of SHA-256 over the raw conversation>`.
    /// Stable across runs, so re-imports overwrite instead of duplicating.
    #[default]
    ContentHash,
    /// `conv_<index>_<unix micros at import time>`. Differs on every run.
    Timestamp,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NormalizerConfig {
    pub fallback_id: FallbackIdStrategy,
}

/// Normalize a whole document: a top-level array, an object holding one of
/// the known container keys, or a single conversation object.
pub fn normalize_value(value: &Value, config: &NormalizerConfig) -> Vec<Conversation> {
    let conversations: Vec<Conversation> = conversation_values(value)
        .into_iter()
        .enumerate()
        .filter_map(|(index, raw)| normalize_conversation(raw, index, config))
        .collect();

    tracing::debug!(
        conversations = conversations.len(),
        "Normalized conversation document"
    );
    conversations
}

fn conversation_values(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => CONVERSATION_CONTAINERS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
            .map(|items| items.iter().collect())
            .unwrap_or_else(|| vec![value]),
        _ => Vec::new(),
    }
}

/// Normalize one conversation object. Non-objects yield `None`.
pub fn normalize_conversation(
    raw: &Value,
    index: usize,
    config: &NormalizerConfig,
) -> Option<Conversation> {
    if !raw.is_object() {
        tracing::debug!(index, "Skipping non-object conversation entry");
        return None;
    }

    let id = resolve(raw, ID_FIELDS, scalar_text)
        .unwrap_or_else(|| fallback_id(raw, index, config.fallback_id));
    let title = resolve(raw, TITLE_FIELDS, scalar_text)
        .unwrap_or_else(|| format!("Conversation {}", index + 1));
    let created_at =
        resolve(raw, CREATED_AT_FIELDS, timestamp::parse_datetime).unwrap_or_else(Utc::now);

    Some(Conversation {
        id,
        created_at,
        title,
        messages: extract_messages(raw),
    })
}

fn fallback_id(raw: &Value, index: usize, strategy: FallbackIdStrategy) -> String {
    match strategy {
        FallbackIdStrategy::ContentHash => {
            // serde_json keeps object keys sorted, so equal documents hash equally.
            let digest = Sha256::digest(raw.to_string().as_bytes());
            let hash = hex::encode(digest);
            format!("conv_{}_{}", index, &hash[..12])
        }
        FallbackIdStrategy::Timestamp => {
            format!("conv_{}_{}", index, Utc::now().timestamp_micros())
        }
    }
}

fn extract_messages(raw: &Value) -> Vec<Message> {
    if let Some(items) = resolve(raw, MESSAGES_FIELDS, Value::as_array) {
        return items.iter().filter_map(normalize_message).collect();
    }

    // A conversation without a message list that carries text itself is a
    // single message.
    if resolve(raw, CONTENT_FIELDS, Some).is_some() {
        return normalize_message(raw).into_iter().collect();
    }

    Vec::new()
}

fn normalize_message(raw: &Value) -> Option<Message> {
    match raw {
        Value::String(text) => Some(Message::new(Role::Unknown, text.clone())),
        Value::Object(_) => {
            let role = resolve(raw, ROLE_FIELDS, Value::as_str)
                .map(Role::from_source)
                .unwrap_or(Role::Unknown);
            let content = resolve(raw, CONTENT_FIELDS, Some)
                .map(flatten_content)
                .unwrap_or_default();
            let timestamp = resolve(raw, TIMESTAMP_FIELDS, timestamp::passthrough);

            Some(Message {
                role,
                content,
                timestamp,
            })
        }
        _ => None,
    }
}

/// Reduce structured content to plain text. Non-text blocks are dropped.
pub fn flatten_content(content: &Value) -> String {
    match content {
        Value::String(text) => text.clone(),
        Value::Array(blocks) => blocks
            .iter()
            .filter_map(block_text)
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(map) => {
            if let Some(parts) = map.get("parts").and_then(Value::as_array) {
                parts
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join("\n")
            } else {
                map.get("text")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_default()
            }
        }
        _ => String::new(),
    }
}

fn block_text(block: &Value) -> Option<&str> {
    match block {
        Value::String(text) => Some(text.as_str()),
        Value::Object(map) => {
            let text_bearing = match map.get("type").and_then(Value::as_str) {
                Some(kind) => TEXT_BLOCK_TYPES.contains(&kind),
                None => true,
            };
            if text_bearing {
                map.get("text").and_then(Value::as_str)
            } else {
                None
            }
        }
        _ => None,
    }
}
