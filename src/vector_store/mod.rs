//! Vector store for conversation chunks using LanceDB.
//!
//! Each collection is one LanceDB table holding chunk text, metadata, the
//! serialized message window and its embedding.

mod models;
mod schemas;
mod store;

pub use models::{
    ChunkFilter, ChunkRecord, DistanceMetric, QueryHit, StoreConfig, StoreStats,
    DEFAULT_BATCH_SIZE, DEFAULT_COLLECTION_NAME,
};
pub use schemas::chunk_records_schema;
pub use store::ConversationStore;
