//! Candidate key tables for field resolution.
//!
//! Each target field lists the key paths it may be read from, in priority
//! order. A path with more than one segment descends into nested objects.
//! Supporting a new export shape means adding entries here.

use serde_json::Value;

pub type FieldPath = &'static [&'static str];

/// Keys of a top-level object that may hold the conversation array.
pub const CONVERSATION_CONTAINERS: &[&str] = &["conversations", "chats", "data", "items"];

pub const ID_FIELDS: &[FieldPath] = &[&["id"], &["uuid"], &["conversation_id"], &["conversationId"]];

pub const TITLE_FIELDS: &[FieldPath] = &[&["title"], &["name"], &["summary"]];

pub const CREATED_AT_FIELDS: &[FieldPath] = &[
    &["created_at"],
    &["create_time"],
    &["createdAt"],
    &["timestamp"],
    &["updated_at"],
    &["update_time"],
];

pub const MESSAGES_FIELDS: &[FieldPath] = &[&["messages"], &["chat_messages"]];

pub const ROLE_FIELDS: &[FieldPath] = &[&["role"], &["sender"], &["author", "role"], &["author"]];

pub const CONTENT_FIELDS: &[FieldPath] = &[&["content"], &["text"]];

pub const TIMESTAMP_FIELDS: &[FieldPath] = &[
    &["timestamp"],
    &["created_at"],
    &["create_time"],
    &["createdAt"],
];

/// Block `type` values whose `text` is kept when flattening content lists.
pub const TEXT_BLOCK_TYPES: &[&str] = &["text", "input_text", "output_text"];

/// Follow `path` from `value`. Null values count as absent.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in path {
        current = current.as_object()?.get(*key)?;
    }
    (!current.is_null()).then_some(current)
}

/// First candidate path that resolves to a value accepted by `extract`.
pub fn resolve<'a, T>(
    value: &'a Value,
    candidates: &[FieldPath],
    extract: impl Fn(&'a Value) -> Option<T>,
) -> Option<T> {
    candidates
        .iter()
        .filter_map(|path| lookup(value, path))
        .find_map(extract)
}

/// Strings as-is, numbers as their JSON text. Blank strings are rejected.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
