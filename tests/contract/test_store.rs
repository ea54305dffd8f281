use std::sync::Arc;

use chat_recall::embedding::{Embedder, HashingEmbedder};
use chat_recall::models::{Chunk, Conversation, Message, Role};
use chat_recall::services::{Chunker, ChunkingConfig};
use chat_recall::{ConversationStore, RecallConfig, RecallContext, RecallError, ResetConfirmation, StoreConfig};
use chrono::Utc;
use mockall::mock;
use tempfile::TempDir;

mock! {
    pub CountingEmbedder {}

    impl Embedder for CountingEmbedder {
        fn embed(&self, text: &str) -> chat_recall::Result<Vec<f32>>;
        fn embed_batch(&self, texts: &[String]) -> chat_recall::Result<Vec<Vec<f32>>>;
        fn dimensions(&self) -> usize;
        fn model_name(&self) -> String;
    }
}

fn chunks(prefix: &str, conversations: usize, messages: usize) -> Vec<Chunk> {
    let chunker = Chunker::new(ChunkingConfig::default()).unwrap();
    (0..conversations)
        .flat_map(|c| {
            let messages = (0..messages)
                .map(|m| Message::new(Role::User, format!("{prefix} conversation {c} message {m}")))
                .collect();
            let conversation = Conversation::new(format!("{prefix}-{c}"), "Stored", Utc::now())
                .with_messages(messages);
            chunker.chunk(&conversation)
        })
        .collect()
}

fn mock_embedder(dimensions: usize) -> MockCountingEmbedder {
    let mut embedder = MockCountingEmbedder::new();
    embedder.expect_dimensions().return_const(dimensions);
    embedder
        .expect_model_name()
        .returning(|| "mock-model".to_string());
    embedder
}

#[tokio::test]
async fn test_reset_empties_collection() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = ConversationStore::open(
        StoreConfig::new(temp_dir.path()),
        Arc::new(HashingEmbedder::new(32)),
    )
    .await
    .unwrap();

    // 5 conversations of 3 messages and 5 of 2: one chunk each.
    let mut batch = chunks("r", 5, 3);
    batch.extend(chunks("s", 5, 2));
    assert_eq!(batch.len(), 10);

    assert_eq!(store.add(&batch).await.unwrap(), 10);
    assert_eq!(store.stats().await.unwrap().total_chunks, 10);

    store.reset().await.unwrap();
    assert_eq!(store.stats().await.unwrap().total_chunks, 0);

    // The collection is usable again after a reset.
    assert_eq!(store.add(&batch[..3]).await.unwrap(), 3);
    assert_eq!(store.count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_context_reset_requires_confirmation_token() {
    let temp_dir = TempDir::new().unwrap();
    let config = RecallConfig {
        store: StoreConfig::new(temp_dir.path()),
        ..RecallConfig::default()
    };
    let mut context = RecallContext::with_embedder(config, Arc::new(HashingEmbedder::new(16)))
        .await
        .unwrap();

    context.store().add(&chunks("ctx", 2, 4)).await.unwrap();
    assert_eq!(context.stats().await.unwrap().total_chunks, 4);

    context.reset(ResetConfirmation::assume_yes()).await.unwrap();
    assert_eq!(context.stats().await.unwrap().total_chunks, 0);
}

#[tokio::test]
async fn test_readding_overwrites_instead_of_duplicating() {
    let temp_dir = TempDir::new().unwrap();
    let store = ConversationStore::open(
        StoreConfig::new(temp_dir.path()).with_batch_size(3),
        Arc::new(HashingEmbedder::new(16)),
    )
    .await
    .unwrap();

    let batch = chunks("dup", 3, 5);
    store.add(&batch).await.unwrap();
    store.add(&batch).await.unwrap();

    assert_eq!(store.count().await.unwrap(), batch.len());

    // Same ids, new text: replaced in place, new ids appended.
    let mut edited: Vec<Chunk> = batch
        .iter()
        .map(|chunk| {
            let mut chunk = chunk.clone();
            chunk.text = format!("edited {}", chunk.record_id());
            chunk
        })
        .collect();
    edited.extend(chunks("fresh", 1, 2));
    assert_eq!(store.add(&edited).await.unwrap(), batch.len() + 1);
    assert_eq!(store.count().await.unwrap(), batch.len() + 1);

    for chunk in &batch {
        let record = store.get(&chunk.record_id()).await.unwrap().unwrap();
        assert_eq!(record.chunk.text, format!("edited {}", chunk.record_id()));
        assert_eq!(record.chunk.messages, chunk.messages);
    }
    assert!(store.get("fresh-0_chunk_0").await.unwrap().is_some());
}

#[tokio::test]
async fn test_embeds_in_configured_batches() {
    let temp_dir = TempDir::new().unwrap();
    let mut embedder = mock_embedder(4);
    embedder
        .expect_embed_batch()
        .times(3)
        .returning(|texts| Ok(texts.iter().map(|_| vec![0.5, 0.5, 0.5, 0.5]).collect()));

    let store = ConversationStore::open(
        StoreConfig::new(temp_dir.path()).with_batch_size(4),
        Arc::new(embedder),
    )
    .await
    .unwrap();

    let batch = chunks("b", 10, 2);
    assert_eq!(store.add(&batch).await.unwrap(), 10);
    assert_eq!(store.count().await.unwrap(), 10);
}

#[tokio::test]
async fn test_wrong_vector_count_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let mut embedder = mock_embedder(4);
    embedder
        .expect_embed_batch()
        .returning(|_| Ok(vec![vec![1.0, 0.0, 0.0, 0.0]]));

    let store = ConversationStore::open(StoreConfig::new(temp_dir.path()), Arc::new(embedder))
        .await
        .unwrap();

    let result = store.add(&chunks("w", 2, 2)).await;
    assert!(matches!(result, Err(RecallError::Validation { .. })));
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_wrong_vector_width_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let mut embedder = mock_embedder(4);
    embedder
        .expect_embed_batch()
        .returning(|texts| Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect()));

    let store = ConversationStore::open(StoreConfig::new(temp_dir.path()), Arc::new(embedder))
        .await
        .unwrap();

    let result = store.add(&chunks("n", 1, 2)).await;
    assert!(matches!(result, Err(RecallError::Validation { .. })));
}

#[tokio::test]
async fn test_embedder_failure_propagates() {
    let temp_dir = TempDir::new().unwrap();
    let mut embedder = mock_embedder(4);
    embedder
        .expect_embed_batch()
        .returning(|_| Err(RecallError::embedding("model crashed")));

    let store = ConversationStore::open(StoreConfig::new(temp_dir.path()), Arc::new(embedder))
        .await
        .unwrap();

    let result = store.add(&chunks("f", 1, 2)).await;
    assert!(matches!(result, Err(RecallError::Embedding { .. })));
}

#[tokio::test]
async fn test_empty_add_skips_embedder() {
    let temp_dir = TempDir::new().unwrap();
    let mut embedder = mock_embedder(4);
    embedder.expect_embed_batch().never();

    let store = ConversationStore::open(StoreConfig::new(temp_dir.path()), Arc::new(embedder))
        .await
        .unwrap();

    assert_eq!(store.add(&[]).await.unwrap(), 0);
}

#[tokio::test]
async fn test_stats_identify_collection() {
    let temp_dir = TempDir::new().unwrap();
    let store = ConversationStore::open(
        StoreConfig::new(temp_dir.path().join("db")).with_collection("work"),
        Arc::new(HashingEmbedder::new(48)),
    )
    .await
    .unwrap();

    store.add(&chunks("st", 1, 5)).await.unwrap();
    let stats = store.stats().await.unwrap();

    assert_eq!(stats.total_chunks, 2);
    assert_eq!(stats.collection_name, "work");
    assert_eq!(stats.db_path, temp_dir.path().join("db"));
    assert_eq!(stats.dimensions, 48);
    assert_eq!(store.dimensions(), 48);
    assert_eq!(stats.model_name, "hashing-48");
}

#[tokio::test]
async fn test_collections_are_isolated() {
    let temp_dir = TempDir::new().unwrap();
    let embedder: Arc<dyn Embedder> = Arc::new(HashingEmbedder::new(16));

    let first = ConversationStore::open(
        StoreConfig::new(temp_dir.path()).with_collection("first"),
        embedder.clone(),
    )
    .await
    .unwrap();
    let second = ConversationStore::open(
        StoreConfig::new(temp_dir.path()).with_collection("second"),
        embedder,
    )
    .await
    .unwrap();

    first.add(&chunks("iso", 2, 3)).await.unwrap();

    assert_eq!(first.count().await.unwrap(), 2);
    assert_eq!(second.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_invalid_store_config() {
    let temp_dir = TempDir::new().unwrap();
    let result = ConversationStore::open(
        StoreConfig::new(temp_dir.path()).with_batch_size(0),
        Arc::new(HashingEmbedder::new(16)),
    )
    .await;

    assert!(matches!(result, Err(RecallError::Validation { .. })));
}
