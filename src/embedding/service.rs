//! FastEmbed-backed embedder.

use anyhow::Context;
use fastembed::{EmbeddingModel as FastEmbedModel, InitOptions, TextEmbedding};

use super::config::EmbeddingConfig;
use super::models::{EmbeddingModel, ModelInfo};
use super::provider::Embedder;
use crate::error::{RecallError, Result};

/// Runs a FastEmbed model in-process. The model is fetched into the cache
/// directory the first time it is loaded.
pub struct EmbeddingService {
    model: TextEmbedding,
    info: ModelInfo,
}

impl EmbeddingService {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let cache_dir = config.resolved_cache_dir();
        tracing::info!(
            model = %config.model,
            cache_dir = %cache_dir.display(),
            "Loading embedding model"
        );

        let options = InitOptions::new(fastembed_variant(config.model))
            .with_cache_dir(cache_dir)
            .with_show_download_progress(config.show_download_progress);
        let model = TextEmbedding::try_new(options)
            .with_context(|| format!("Failed to load embedding model {}", config.model))?;

        Ok(Self {
            model,
            info: ModelInfo::from(config.model),
        })
    }
}

fn fastembed_variant(model: EmbeddingModel) -> FastEmbedModel {
    match model {
        EmbeddingModel::AllMiniLML6V2 => FastEmbedModel::AllMiniLML6V2,
        EmbeddingModel::AllMiniLML6V2Q => FastEmbedModel::AllMiniLML6V2Q,
        EmbeddingModel::BGESmallENV15 => FastEmbedModel::BGESmallENV15,
        EmbeddingModel::BGESmallENV15Q => FastEmbedModel::BGESmallENV15Q,
        EmbeddingModel::BGEBaseENV15 => FastEmbedModel::BGEBaseENV15,
        EmbeddingModel::BGEBaseENV15Q => FastEmbedModel::BGEBaseENV15Q,
    }
}

impl Embedder for EmbeddingService {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self
            .model
            .embed(vec![text], None)
            .context("Embedding a single text failed")?;
        vectors
            .pop()
            .ok_or_else(|| RecallError::embedding("model returned no vector"))
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let vectors = self
            .model
            .embed(texts.to_vec(), None)
            .with_context(|| format!("Embedding a batch of {} texts failed", texts.len()))?;
        Ok(vectors)
    }

    fn dimensions(&self) -> usize {
        self.info.dimensions
    }

    fn model_name(&self) -> String {
        self.info.name.clone()
    }
}
