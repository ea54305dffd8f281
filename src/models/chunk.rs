use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::message::Message;

/// Id under which a chunk is stored: `{conversation_id}_chunk_{chunk_index}`.
pub fn chunk_record_id(conversation_id: &str, chunk_index: usize) -> String {
    format!("{conversation_id}_chunk_{chunk_index}")
}

/// A window of consecutive messages from one conversation, embedded and
/// stored as one retrievable unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    pub text: String,
    pub conversation_id: String,
    pub conversation_title: String,
    pub created_at: DateTime<Utc>,
    pub chunk_index: usize,
    /// Half-open range `[message_start_idx, message_end_idx)` into the
    /// conversation's messages.
    pub message_start_idx: usize,
    pub message_end_idx: usize,
    pub messages: Vec<Message>,
}

impl Chunk {
    pub fn record_id(&self) -> String {
        chunk_record_id(&self.conversation_id, self.chunk_index)
    }

    pub fn message_count(&self) -> usize {
        self.message_end_idx - self.message_start_idx
    }
}
