use serde::{Deserialize, Serialize};

use crate::error::{RecallError, Result};
use crate::models::{Chunk, Conversation, Message};

/// Sliding-window parameters, counted in messages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 3,
            overlap: 1,
        }
    }
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(RecallError::invalid_config(
                "chunk_size must be greater than zero",
            ));
        }
        if self.overlap == 0 {
            return Err(RecallError::invalid_config(
                "overlap must be greater than zero",
            ));
        }
        if self.overlap >= self.chunk_size {
            return Err(RecallError::invalid_config(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }

    pub fn stride(&self) -> usize {
        self.chunk_size - self.overlap
    }

    /// Number of chunks a conversation of `message_count` messages yields.
    pub fn expected_chunks(&self, message_count: usize) -> usize {
        if message_count == 0 {
            return 0;
        }
        let remaining = message_count.saturating_sub(self.overlap);
        remaining.div_ceil(self.stride()).max(1)
    }
}

/// Splits conversations into overlapping message windows.
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Windows start at 0 and advance by `chunk_size - overlap`; the last
    /// window may be short. Empty conversations yield no chunks.
    pub fn chunk(&self, conversation: &Conversation) -> Vec<Chunk> {
        let total = conversation.message_count();
        let mut chunks = Vec::with_capacity(self.config.expected_chunks(total));
        if total == 0 {
            return chunks;
        }

        let mut start = 0;
        loop {
            let end = (start + self.config.chunk_size).min(total);
            let window = &conversation.messages[start..end];

            chunks.push(Chunk {
                text: render_messages(window),
                conversation_id: conversation.id.clone(),
                conversation_title: conversation.title.clone(),
                created_at: conversation.created_at,
                chunk_index: chunks.len(),
                message_start_idx: start,
                message_end_idx: end,
                messages: window.to_vec(),
            });

            if start + self.config.chunk_size >= total {
                break;
            }
            start += self.config.stride();
        }

        chunks
    }

    pub fn chunk_all(&self, conversations: &[Conversation]) -> Vec<Chunk> {
        conversations
            .iter()
            .flat_map(|conversation| self.chunk(conversation))
            .collect()
    }
}

/// Convenience wrapper that validates `config` on every call.
pub fn chunk_conversation(
    conversation: &Conversation,
    config: &ChunkingConfig,
) -> Result<Vec<Chunk>> {
    Ok(Chunker::new(config.clone())?.chunk(conversation))
}

/// `"<Role>: <content>"` per message, separated by a blank line.
pub fn render_messages(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|message| format!("{}: {}", message.role, message.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}
