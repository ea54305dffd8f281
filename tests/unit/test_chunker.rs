use std::collections::HashSet;

use chat_recall::models::{Conversation, Message, Role};
use chat_recall::services::{chunk_conversation, Chunker, ChunkingConfig};
use chrono::Utc;

fn conversation(id: &str, count: usize) -> Conversation {
    let messages = (0..count)
        .map(|i| Message::new(Role::User, format!("{id} message {i}")))
        .collect();
    Conversation::new(id, format!("Conversation {id}"), Utc::now()).with_messages(messages)
}

fn formula(n: usize, size: usize, overlap: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let stride = size - overlap;
    let remaining = n.saturating_sub(overlap);
    ((remaining + stride - 1) / stride).max(1)
}

#[test]
fn test_five_messages_three_one() {
    let chunks = chunk_conversation(&conversation("c", 5), &ChunkingConfig::new(3, 1)).unwrap();

    assert_eq!(chunks.len(), 2);
    assert_eq!((chunks[0].message_start_idx, chunks[0].message_end_idx), (0, 3));
    assert_eq!((chunks[1].message_start_idx, chunks[1].message_end_idx), (2, 5));
    assert_eq!(chunks[0].record_id(), "c_chunk_0");
    assert_eq!(chunks[1].record_id(), "c_chunk_1");
}

#[test]
fn test_chunk_count_formula() {
    for (size, overlap) in [(3, 1), (4, 1), (4, 2), (6, 5), (10, 3)] {
        let chunker = Chunker::new(ChunkingConfig::new(size, overlap)).unwrap();
        for n in 0..40 {
            let chunks = chunker.chunk(&conversation("f", n));
            assert_eq!(
                chunks.len(),
                formula(n, size, overlap),
                "size={size} overlap={overlap} n={n}"
            );
        }
    }
}

#[test]
fn test_windows_are_contiguous_and_non_empty() {
    let chunker = Chunker::new(ChunkingConfig::new(4, 2)).unwrap();
    let conversation = conversation("w", 11);
    let chunks = chunker.chunk(&conversation);

    for (index, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.chunk_index, index);
        assert!(chunk.message_end_idx > chunk.message_start_idx);
        assert!(chunk.message_count() <= 4);
        assert_eq!(chunk.message_count(), chunk.messages.len());
        assert_eq!(
            chunk.messages,
            conversation.messages[chunk.message_start_idx..chunk.message_end_idx]
        );
    }
    assert_eq!(chunks.last().unwrap().message_end_idx, 11);
}

#[test]
fn test_ids_unique_across_batch() {
    let chunker = Chunker::new(ChunkingConfig::default()).unwrap();
    let conversations: Vec<Conversation> = (0..6)
        .map(|i| conversation(&format!("conv-{i}"), 3 + i * 2))
        .collect();
    let chunks = chunker.chunk_all(&conversations);

    let ids: HashSet<String> = chunks.iter().map(|chunk| chunk.record_id()).collect();
    assert_eq!(ids.len(), chunks.len());
}

#[test]
fn test_text_rendering() {
    let conversation = Conversation::new("r", "Render", Utc::now()).with_messages(vec![
        Message::new(Role::User, "How do lifetimes work?"),
        Message::new(Role::Assistant, "They name borrow scopes."),
        Message::new(Role::Unknown, "???"),
    ]);
    let chunks = chunk_conversation(&conversation, &ChunkingConfig::default()).unwrap();

    assert_eq!(
        chunks[0].text,
        "User: How do lifetimes work?\n\nAssistant: They name borrow scopes.\n\nUnknown: ???"
    );
    assert_eq!(chunks[0].conversation_title, "Render");
}

#[test]
fn test_invalid_configs() {
    assert!(Chunker::new(ChunkingConfig::new(3, 3)).is_err());
    assert!(Chunker::new(ChunkingConfig::new(3, 0)).is_err());
    assert!(Chunker::new(ChunkingConfig::new(0, 0)).is_err());
}
