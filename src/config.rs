//! Configuration file management for chat-recall
//!
//! Values are read from `~/.chat-recall/config.toml` (or an explicit path)
//! and can be overridden by environment variables.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::embedding::{EmbeddingConfig, EmbeddingModel, EmbeddingProvider};
use crate::env::{embedding as env_embedding, store as env_store};
use crate::error::{RecallError, Result};
use crate::normalizer::NormalizerConfig;
use crate::services::chunker::ChunkingConfig;
use crate::vector_store::StoreConfig;

const APP_DIR: &str = ".chat-recall";

/// Application directory (`~/.chat-recall`), falling back to the working directory.
pub fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Configuration structure matching config.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RecallConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub chunking: ChunkingConfig,

    #[serde(default)]
    pub import: NormalizerConfig,
}

impl RecallConfig {
    /// Get the config file path (~/.chat-recall/config.toml)
    pub fn default_path() -> PathBuf {
        app_dir().join("config.toml")
    }

    /// Load configuration from the default location, then apply environment
    /// overrides. A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        let config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_env()
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config: RecallConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific file, creating parent directories
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env(mut self) -> Result<Self> {
        if let Ok(db_path) = env::var(env_store::DB_PATH) {
            self.store.db_path = PathBuf::from(db_path);
        }

        if let Ok(collection) = env::var(env_store::COLLECTION) {
            self.store.collection_name = collection;
        }

        if let Ok(provider) = env::var(env_embedding::PROVIDER) {
            self.embedding.provider = provider
                .parse::<EmbeddingProvider>()
                .map_err(RecallError::invalid_config)?;
        }

        if let Ok(model) = env::var(env_embedding::MODEL) {
            self.embedding.model = model
                .parse::<EmbeddingModel>()
                .map_err(RecallError::invalid_config)?;
        }

        if let Ok(cache_dir) = env::var(env_embedding::MODEL_CACHE) {
            self.embedding.cache_dir = Some(PathBuf::from(cache_dir));
        }

        self.validate()?;
        Ok(self)
    }

    /// Check values that would otherwise fail deep inside an import
    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;

        if self.embedding.dimensions() == 0 {
            return Err(RecallError::validation(
                "embedding.hashing_dimensions",
                "must be greater than zero",
            ));
        }

        if self.store.batch_size == 0 {
            return Err(RecallError::validation(
                "store.batch_size",
                "must be greater than zero",
            ));
        }

        if self.store.collection_name.trim().is_empty() {
            return Err(RecallError::validation(
                "store.collection_name",
                "must not be empty",
            ));
        }

        Ok(())
    }
}
