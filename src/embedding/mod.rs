//! Embedding generation for semantic search.
//!
//! `Embedder` is the narrow contract the store depends on. Two providers ship
//! with the crate: `EmbeddingService` wraps FastEmbed-rs for local, CPU-based
//! model inference, and `HashingEmbedder` is a deterministic feature-hashing
//! embedder that needs no model download.

mod config;
mod hashing;
mod models;
mod provider;
#[cfg(feature = "fastembed")]
mod service;

pub use config::{EmbeddingConfig, EmbeddingProvider};
pub use hashing::{HashingEmbedder, DEFAULT_HASHING_DIMENSIONS};
pub use models::{EmbeddingModel, ModelInfo};
pub use provider::Embedder;
#[cfg(feature = "fastembed")]
pub use service::EmbeddingService;

use std::sync::Arc;

use crate::error::Result;

/// Build the embedder the configuration asks for.
pub fn build_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    match config.provider {
        EmbeddingProvider::Hashing => {
            Ok(Arc::new(HashingEmbedder::new(config.hashing_dimensions)))
        }
        EmbeddingProvider::FastEmbed => fastembed_embedder(config),
    }
}

#[cfg(feature = "fastembed")]
fn fastembed_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    Ok(Arc::new(EmbeddingService::new(config)?))
}

// Same width as the requested model, so a store created here stays usable
// once the feature is turned back on.
#[cfg(not(feature = "fastembed"))]
fn fastembed_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    tracing::warn!(
        model = %config.model,
        "fastembed feature disabled, falling back to hashing embedder"
    );
    Ok(Arc::new(HashingEmbedder::new(config.model.dimensions())))
}
