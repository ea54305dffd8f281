use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::models::Message;
use crate::vector_store::{ChunkFilter, ConversationStore, DistanceMetric, QueryHit};

/// One ranked search result with enough metadata to rebuild the message
/// window it came from.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    /// 1-based position, best first.
    pub rank: usize,
    pub id: String,
    pub text: String,
    pub conversation_id: String,
    pub conversation_title: String,
    pub created_at: DateTime<Utc>,
    pub chunk_index: usize,
    pub message_start_idx: usize,
    pub message_end_idx: usize,
    pub messages: Vec<Message>,
    /// Raw distance under the collection's metric.
    pub distance: f32,
    /// Relevance in `[0, 1]`, higher is better.
    pub score: f32,
}

/// Query embedding plus store lookup, with explicit score mapping.
pub struct RetrievalService<'a> {
    store: &'a ConversationStore,
}

impl<'a> RetrievalService<'a> {
    pub fn new(store: &'a ConversationStore) -> Self {
        Self { store }
    }

    /// Up to `limit` results for `query`, best first.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        self.search_filtered(query, limit, None).await
    }

    pub async fn search_filtered(
        &self,
        query: &str,
        limit: usize,
        filter: Option<ChunkFilter>,
    ) -> Result<Vec<SearchResult>> {
        let hits = self.store.query(query, limit, filter).await?;
        let results = rank_hits(hits, self.store.config().distance_metric);

        tracing::debug!(
            query = %query,
            limit,
            results = results.len(),
            "Search completed"
        );
        Ok(results)
    }
}

/// Number hits in order and attach scores for `metric`.
pub fn rank_hits(hits: Vec<QueryHit>, metric: DistanceMetric) -> Vec<SearchResult> {
    hits.into_iter()
        .enumerate()
        .map(|(position, hit)| SearchResult {
            rank: position + 1,
            id: hit.id,
            text: hit.chunk.text,
            conversation_id: hit.chunk.conversation_id,
            conversation_title: hit.chunk.conversation_title,
            created_at: hit.chunk.created_at,
            chunk_index: hit.chunk.chunk_index,
            message_start_idx: hit.chunk.message_start_idx,
            message_end_idx: hit.chunk.message_end_idx,
            messages: hit.chunk.messages,
            distance: hit.distance,
            score: metric.score(hit.distance),
        })
        .collect()
}
