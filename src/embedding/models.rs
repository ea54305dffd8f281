//! FastEmbed model catalogue.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// FastEmbed text models this crate knows how to size. `Q` variants are
/// quantized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EmbeddingModel {
    AllMiniLML6V2,
    AllMiniLML6V2Q,
    BGESmallENV15,
    BGESmallENV15Q,
    BGEBaseENV15,
    BGEBaseENV15Q,
}

struct ModelSpec {
    model: EmbeddingModel,
    config_name: &'static str,
    dimensions: usize,
    quantized: bool,
}

const CATALOGUE: &[ModelSpec] = &[
    ModelSpec {
        model: EmbeddingModel::AllMiniLML6V2,
        config_name: "all-minilm-l6-v2",
        dimensions: 384,
        quantized: false,
    },
    ModelSpec {
        model: EmbeddingModel::AllMiniLML6V2Q,
        config_name: "all-minilm-l6-v2-q",
        dimensions: 384,
        quantized: true,
    },
    ModelSpec {
        model: EmbeddingModel::BGESmallENV15,
        config_name: "bge-small-en-v1.5",
        dimensions: 384,
        quantized: false,
    },
    ModelSpec {
        model: EmbeddingModel::BGESmallENV15Q,
        config_name: "bge-small-en-v1.5-q",
        dimensions: 384,
        quantized: true,
    },
    ModelSpec {
        model: EmbeddingModel::BGEBaseENV15,
        config_name: "bge-base-en-v1.5",
        dimensions: 768,
        quantized: false,
    },
    ModelSpec {
        model: EmbeddingModel::BGEBaseENV15Q,
        config_name: "bge-base-en-v1.5-q",
        dimensions: 768,
        quantized: true,
    },
];

impl EmbeddingModel {
    pub fn all() -> impl Iterator<Item = EmbeddingModel> {
        CATALOGUE.iter().map(|spec| spec.model)
    }

    fn spec(&self) -> &'static ModelSpec {
        // Every variant has exactly one catalogue row.
        CATALOGUE
            .iter()
            .find(|spec| spec.model == *self)
            .unwrap_or(&CATALOGUE[0])
    }

    pub fn dimensions(&self) -> usize {
        self.spec().dimensions
    }

    pub fn is_quantized(&self) -> bool {
        self.spec().quantized
    }

    /// Kebab-case name used in config files and `CHAT_RECALL_EMBEDDING_MODEL`.
    pub fn config_name(&self) -> &'static str {
        self.spec().config_name
    }
}

impl fmt::Display for EmbeddingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_name())
    }
}

impl FromStr for EmbeddingModel {
    type Err = String;

    /// Accepts the config name or the FastEmbed variant name, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::all()
            .find(|model| {
                model.config_name().eq_ignore_ascii_case(wanted)
                    || format!("{model:?}").eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| format!("Unknown embedding model: {s}"))
    }
}

impl TryFrom<String> for EmbeddingModel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EmbeddingModel> for String {
    fn from(model: EmbeddingModel) -> Self {
        model.config_name().to_string()
    }
}

/// What a loaded model reports about itself.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub model: EmbeddingModel,
    pub name: String,
    pub dimensions: usize,
    pub quantized: bool,
}

impl From<EmbeddingModel> for ModelInfo {
    fn from(model: EmbeddingModel) -> Self {
        Self {
            model,
            name: model.config_name().to_string(),
            dimensions: model.dimensions(),
            quantized: model.is_quantized(),
        }
    }
}
