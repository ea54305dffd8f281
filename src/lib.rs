pub mod config;
pub mod context;
pub mod embedding;
pub mod models;
pub mod normalizer;
pub mod sample;
pub mod services;
pub mod vector_store;

pub mod env;
pub mod error;
pub mod logging;

pub use config::RecallConfig;
pub use context::{RecallContext, ResetConfirmation};
pub use embedding::{Embedder, HashingEmbedder};
pub use error::{RecallError, Result};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use models::{Chunk, Conversation, Message, Role};
pub use services::{ImportSummary, SearchResult};
pub use vector_store::{ChunkFilter, ConversationStore, DistanceMetric, StoreConfig, StoreStats};
