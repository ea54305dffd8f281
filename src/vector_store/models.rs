//! Data models for the conversation vector store.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RecallError;
use crate::models::Chunk;

pub const DEFAULT_COLLECTION_NAME: &str = "claude_conversations";
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Where a collection lives and how it is written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// LanceDB directory, created on open if missing.
    pub db_path: PathBuf,

    /// Table name inside the database.
    pub collection_name: String,

    /// Chunks embedded and written per round trip.
    pub batch_size: usize,

    pub distance_metric: DistanceMetric,

    /// Draw a progress bar while adding chunks.
    pub show_progress: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: crate::config::app_dir().join("lancedb"),
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            distance_metric: DistanceMetric::default(),
            show_progress: false,
        }
    }
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            ..Self::default()
        }
    }

    pub fn with_collection(mut self, collection_name: impl Into<String>) -> Self {
        self.collection_name = collection_name.into();
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_distance_metric(mut self, distance_metric: DistanceMetric) -> Self {
        self.distance_metric = distance_metric;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }
}

/// Distance used for nearest-neighbor search, and how a raw distance maps to
/// a relevance score in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    #[default]
    Cosine,
    L2,
    Dot,
}

impl DistanceMetric {
    /// Relevance score for a raw distance. Never increases as distance grows.
    ///
    /// Cosine and dot distances are `1 - similarity`, so the score is that
    /// similarity clamped to `[0, 1]`. L2 is unbounded and maps through
    /// `1 / (1 + d)`.
    pub fn score(&self, distance: f32) -> f32 {
        if distance.is_nan() {
            return 0.0;
        }
        match self {
            DistanceMetric::Cosine | DistanceMetric::Dot => (1.0 - distance).clamp(0.0, 1.0),
            DistanceMetric::L2 => 1.0 / (1.0 + distance.max(0.0)),
        }
    }

    pub fn as_lance(&self) -> lancedb::DistanceType {
        match self {
            DistanceMetric::Cosine => lancedb::DistanceType::Cosine,
            DistanceMetric::L2 => lancedb::DistanceType::L2,
            DistanceMetric::Dot => lancedb::DistanceType::Dot,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceMetric::Cosine => "cosine",
            DistanceMetric::L2 => "l2",
            DistanceMetric::Dot => "dot",
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DistanceMetric {
    type Err = RecallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cosine" => Ok(DistanceMetric::Cosine),
            "l2" | "euclidean" => Ok(DistanceMetric::L2),
            "dot" => Ok(DistanceMetric::Dot),
            _ => Err(RecallError::invalid_config(format!(
                "unknown distance metric: {s}"
            ))),
        }
    }
}

/// A chunk with its embedding, as persisted.
#[derive(Debug, Clone)]
pub struct ChunkRecord {
    pub chunk: Chunk,

    pub vector: Vec<f32>,

    /// When the embedding was generated.
    pub embedded_at: DateTime<Utc>,

    /// Name of the model that produced `vector`.
    pub model_name: String,
}

impl ChunkRecord {
    pub fn id(&self) -> String {
        self.chunk.record_id()
    }
}

/// One nearest-neighbor match, closest first.
#[derive(Debug, Clone)]
pub struct QueryHit {
    pub id: String,
    pub chunk: Chunk,
    pub distance: f32,
}

/// Restricts a query to a conversation or a creation-time window.
#[derive(Debug, Clone, Default)]
pub struct ChunkFilter {
    pub conversation_id: Option<String>,

    /// Inclusive lower bound on the conversation's `created_at`.
    pub created_after: Option<DateTime<Utc>>,

    /// Exclusive upper bound on the conversation's `created_at`.
    pub created_before: Option<DateTime<Utc>>,
}

impl ChunkFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_conversation_id(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }

    pub fn with_time_range(
        mut self,
        after: Option<DateTime<Utc>>,
        before: Option<DateTime<Utc>>,
    ) -> Self {
        self.created_after = after;
        self.created_before = before;
        self
    }

    /// Build a SQL WHERE clause for LanceDB.
    pub fn to_sql(&self) -> Option<String> {
        let mut conditions = Vec::new();

        if let Some(ref conversation_id) = self.conversation_id {
            conditions.push(format!("conversation_id = {}", sql_literal(conversation_id)));
        }

        if let Some(after) = self.created_after {
            conditions.push(format!(
                "created_at >= timestamp '{}'",
                after.format(SQL_TIMESTAMP_FORMAT)
            ));
        }

        if let Some(before) = self.created_before {
            conditions.push(format!(
                "created_at < timestamp '{}'",
                before.format(SQL_TIMESTAMP_FORMAT)
            ));
        }

        if conditions.is_empty() {
            None
        } else {
            Some(conditions.join(" AND "))
        }
    }
}

// RFC 3339 in UTC, matching the `Timestamp(µs, "UTC")` column.
const SQL_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Quote a string for a LanceDB SQL predicate.
pub fn sql_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Statistics about one collection.
#[derive(Debug, Clone)]
pub struct StoreStats {
    pub total_chunks: usize,
    pub collection_name: String,
    pub db_path: PathBuf,
    pub dimensions: usize,
    pub model_name: String,
    pub distance_metric: DistanceMetric,
}
