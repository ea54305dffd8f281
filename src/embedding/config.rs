use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::hashing::DEFAULT_HASHING_DIMENSIONS;
use super::models::EmbeddingModel;

/// Which backend turns chunk text into vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    /// Local ONNX inference through FastEmbed.
    #[default]
    FastEmbed,
    /// Token feature hashing. No download, no model quality.
    Hashing,
}

impl fmt::Display for EmbeddingProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FastEmbed => write!(f, "fastembed"),
            Self::Hashing => write!(f, "hashing"),
        }
    }
}

impl FromStr for EmbeddingProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fastembed" => Ok(Self::FastEmbed),
            "hashing" | "hash" => Ok(Self::Hashing),
            other => Err(format!("Unknown embedding provider: {other}")),
        }
    }
}

/// `[embedding]` section of the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProvider,

    /// Only read by the fastembed provider.
    pub model: EmbeddingModel,

    /// Vector width of the hashing provider.
    pub hashing_dimensions: usize,

    /// Model download directory. `None` means `<app dir>/models`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,

    pub show_download_progress: bool,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::default(),
            model: EmbeddingModel::AllMiniLML6V2,
            hashing_dimensions: DEFAULT_HASHING_DIMENSIONS,
            cache_dir: None,
            show_download_progress: true,
        }
    }
}

impl EmbeddingConfig {
    pub fn fastembed(model: EmbeddingModel) -> Self {
        Self {
            provider: EmbeddingProvider::FastEmbed,
            model,
            ..Default::default()
        }
    }

    pub fn hashing(dimensions: usize) -> Self {
        Self {
            provider: EmbeddingProvider::Hashing,
            hashing_dimensions: dimensions,
            ..Default::default()
        }
    }

    pub fn with_cache_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(path.into());
        self
    }

    pub fn with_download_progress(mut self, show: bool) -> Self {
        self.show_download_progress = show;
        self
    }

    /// Width of the vectors the configured provider will produce.
    pub fn dimensions(&self) -> usize {
        match self.provider {
            EmbeddingProvider::FastEmbed => self.model.dimensions(),
            EmbeddingProvider::Hashing => self.hashing_dimensions,
        }
    }

    pub fn resolved_cache_dir(&self) -> PathBuf {
        match &self.cache_dir {
            Some(dir) => dir.clone(),
            None => default_cache_dir(&crate::config::app_dir()),
        }
    }
}

fn default_cache_dir(app_dir: &Path) -> PathBuf {
    app_dir.join("models")
}
