//! LanceDB conversation chunk store.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use arrow_array::{
    Array, FixedSizeListArray, Float32Array, Int32Array, RecordBatch, RecordBatchIterator,
    StringArray, TimestampMicrosecondArray,
};
use arrow_schema::Schema;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{connect, Connection, Table};
use tracing::{debug, info, warn};

use super::models::{
    sql_literal, ChunkFilter, ChunkRecord, QueryHit, StoreConfig, StoreStats,
};
use super::schemas::{chunk_records_schema, vector_dimensions, vector_item_field, VECTOR_COLUMN};
use crate::embedding::Embedder;
use crate::error::{RecallError, Result};
use crate::models::{Chunk, Message};

/// A persistent collection of embedded conversation chunks, identified by
/// `(db_path, collection_name)`. Opening the same pair again sees the same
/// records.
pub struct ConversationStore {
    connection: Connection,
    table: Table,
    config: StoreConfig,
    embedder: Arc<dyn Embedder>,
    dimensions: usize,
}

impl ConversationStore {
    /// Open or create the collection described by `config`.
    ///
    /// Fails if the collection already holds vectors of a different width
    /// than `embedder` produces.
    pub async fn open(config: StoreConfig, embedder: Arc<dyn Embedder>) -> Result<Self> {
        if config.batch_size == 0 {
            return Err(RecallError::validation(
                "batch_size",
                "must be greater than zero",
            ));
        }
        if config.collection_name.trim().is_empty() {
            return Err(RecallError::validation(
                "collection_name",
                "must not be empty",
            ));
        }

        std::fs::create_dir_all(&config.db_path)?;
        let uri = config.db_path.to_string_lossy().to_string();
        let connection = connect(&uri).execute().await?;

        let dimensions = embedder.dimensions();
        let table =
            Self::open_or_create_table(&connection, &config.collection_name, dimensions).await?;

        info!(
            db_path = %config.db_path.display(),
            collection = %config.collection_name,
            dimensions,
            model = %embedder.model_name(),
            "Opened conversation store"
        );

        Ok(Self {
            connection,
            table,
            config,
            embedder,
            dimensions,
        })
    }

    async fn open_or_create_table(
        connection: &Connection,
        name: &str,
        dimensions: usize,
    ) -> Result<Table> {
        let tables = connection.table_names().execute().await?;
        if !tables.iter().any(|table| table == name) {
            return Self::create_table(connection, name, dimensions).await;
        }

        let table = connection.open_table(name).execute().await?;
        let schema = table.schema().await?;
        match vector_dimensions(&schema) {
            Some(existing) if existing == dimensions => Ok(table),
            Some(existing) => Err(RecallError::validation(
                "dimensions",
                format!(
                    "collection '{name}' stores {existing}-dimensional vectors, \
                     but the embedder produces {dimensions}"
                ),
            )),
            None => Err(RecallError::validation(
                "schema",
                format!("collection '{name}' has no '{VECTOR_COLUMN}' column"),
            )),
        }
    }

    async fn create_table(connection: &Connection, name: &str, dimensions: usize) -> Result<Table> {
        let schema = Arc::new(chunk_records_schema(dimensions));
        let empty_batch = records_to_batch(&[], dimensions, &schema)?;
        let batches = RecordBatchIterator::new(vec![Ok(empty_batch)], schema);

        let table = connection
            .create_table(name, Box::new(batches))
            .execute()
            .await?;

        debug!(collection = %name, dimensions, "Created collection");
        Ok(table)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Embed and upsert chunks, `batch_size` at a time. Returns the number of
    /// records written; a chunk repeated within `chunks` is written once, last
    /// occurrence winning.
    pub async fn add(&self, chunks: &[Chunk]) -> Result<usize> {
        let unique = latest_by_id(chunks);
        if unique.is_empty() {
            return Ok(0);
        }

        let progress = self.progress_bar(unique.len());
        let model_name = self.embedder.model_name();
        let mut written = 0;

        for batch in unique.chunks(self.config.batch_size) {
            let texts: Vec<String> = batch.iter().map(|chunk| chunk.text.clone()).collect();
            let vectors = self.embedder.embed_batch(&texts)?;
            self.check_vectors(&vectors, batch.len())?;

            let embedded_at = Utc::now();
            let records: Vec<ChunkRecord> = batch
                .iter()
                .zip(vectors)
                .map(|(chunk, vector)| ChunkRecord {
                    chunk: (*chunk).clone(),
                    vector,
                    embedded_at,
                    model_name: model_name.clone(),
                })
                .collect();

            self.upsert(&records).await?;
            written += records.len();
            progress.inc(records.len() as u64);
            debug!(batch = records.len(), written, "Stored chunk batch");
        }

        progress.finish_and_clear();
        info!(
            chunks = written,
            collection = %self.config.collection_name,
            "Added chunks"
        );
        Ok(written)
    }

    /// Merge `records` into the table keyed on `id`: matching rows are
    /// replaced, new ids are inserted, all in one commit.
    async fn upsert(&self, records: &[ChunkRecord]) -> Result<()> {
        let schema = Arc::new(chunk_records_schema(self.dimensions));
        let batch = records_to_batch(records, self.dimensions, &schema)?;
        let batches = RecordBatchIterator::new(vec![Ok(batch)], schema);

        let mut merge = self.table.merge_insert(&["id"]);
        merge
            .when_matched_update_all(None)
            .when_not_matched_insert_all();
        merge.execute(Box::new(batches)).await?;
        Ok(())
    }

    fn check_vectors(&self, vectors: &[Vec<f32>], expected: usize) -> Result<()> {
        if vectors.len() != expected {
            return Err(RecallError::validation(
                "embeddings",
                format!(
                    "embedder returned {} vectors for {} texts",
                    vectors.len(),
                    expected
                ),
            ));
        }
        if let Some(vector) = vectors.iter().find(|v| v.len() != self.dimensions) {
            return Err(RecallError::validation(
                "embeddings",
                format!(
                    "embedder returned a {}-dimensional vector, collection expects {}",
                    vector.len(),
                    self.dimensions
                ),
            ));
        }
        Ok(())
    }

    fn progress_bar(&self, total: usize) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%)")
        {
            pb.set_style(style.progress_chars("━━╸"));
        }
        pb
    }

    /// Nearest records to `text`, closest first. An empty collection or
    /// `k == 0` gives an empty list.
    pub async fn query(
        &self,
        text: &str,
        k: usize,
        filter: Option<ChunkFilter>,
    ) -> Result<Vec<QueryHit>> {
        if k == 0 || self.count().await? == 0 {
            return Ok(Vec::new());
        }

        let vector = self.embedder.embed(text)?;
        self.check_vectors(std::slice::from_ref(&vector), 1)?;

        let mut query = self
            .table
            .vector_search(vector)?
            .distance_type(self.config.distance_metric.as_lance())
            .limit(k);

        if let Some(sql) = filter.as_ref().and_then(ChunkFilter::to_sql) {
            query = query.only_if(sql);
        }

        let mut stream = query.execute().await?;

        let mut hits = Vec::new();
        while let Some(batch) = stream.try_next().await? {
            for row in 0..batch.num_rows() {
                let distance = batch
                    .column_by_name("_distance")
                    .and_then(|c| c.as_any().downcast_ref::<Float32Array>())
                    .map(|a| a.value(row))
                    .unwrap_or(f32::MAX);
                let record = batch_to_record(&batch, row)?;

                hits.push(QueryHit {
                    id: record.id(),
                    chunk: record.chunk,
                    distance,
                });
            }
        }

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(k);
        Ok(hits)
    }

    /// Get a stored record by id.
    pub async fn get(&self, id: &str) -> Result<Option<ChunkRecord>> {
        let mut stream = self
            .table
            .query()
            .only_if(format!("id = {}", sql_literal(id)))
            .limit(1)
            .execute()
            .await?;

        if let Some(batch) = stream.try_next().await? {
            if batch.num_rows() > 0 {
                return Ok(Some(batch_to_record(&batch, 0)?));
            }
        }

        Ok(None)
    }

    /// Number of stored records, from LanceDB's row count.
    pub async fn count(&self) -> Result<usize> {
        Ok(self.table.count_rows(None).await?)
    }

    pub async fn stats(&self) -> Result<StoreStats> {
        Ok(StoreStats {
            total_chunks: self.count().await?,
            collection_name: self.config.collection_name.clone(),
            db_path: self.config.db_path.clone(),
            dimensions: self.dimensions(),
            model_name: self.embedder.model_name(),
            distance_metric: self.config.distance_metric,
        })
    }

    /// Drop every record and recreate the collection empty under the same
    /// name. Irreversible; callers gate this behind a confirmation.
    pub async fn reset(&mut self) -> Result<()> {
        let name = self.config.collection_name.clone();
        let removed = self.count().await?;

        self.connection.drop_table(&name, &[]).await?;
        self.table = Self::create_table(&self.connection, &name, self.dimensions).await?;

        warn!(collection = %name, removed, "Collection reset");
        Ok(())
    }

    /// Release the table handle and database connection.
    pub fn close(self) {
        let Self {
            connection,
            table,
            config,
            ..
        } = self;
        drop(table);
        drop(connection);
        debug!(collection = %config.collection_name, "Closed conversation store");
    }
}

/// Keep one chunk per record id, preserving first-seen order.
fn latest_by_id(chunks: &[Chunk]) -> Vec<&Chunk> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<&Chunk> = Vec::with_capacity(chunks.len());

    for chunk in chunks {
        match positions.entry(chunk.record_id()) {
            Entry::Occupied(entry) => unique[*entry.get()] = chunk,
            Entry::Vacant(entry) => {
                entry.insert(unique.len());
                unique.push(chunk);
            }
        }
    }

    unique
}

fn index_to_i32(field: &str, value: usize) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_| RecallError::validation(field, format!("{value} does not fit in i32")))
}

/// Convert records to a RecordBatch matching `chunk_records_schema`.
fn records_to_batch(
    records: &[ChunkRecord],
    dimensions: usize,
    schema: &Arc<Schema>,
) -> Result<RecordBatch> {
    let id = StringArray::from_iter_values(records.iter().map(ChunkRecord::id));
    let conversation_id =
        StringArray::from_iter_values(records.iter().map(|r| r.chunk.conversation_id.as_str()));
    let conversation_title =
        StringArray::from_iter_values(records.iter().map(|r| r.chunk.conversation_title.as_str()));
    let created_at = TimestampMicrosecondArray::from(
        records
            .iter()
            .map(|r| r.chunk.created_at.timestamp_micros())
            .collect::<Vec<_>>(),
    )
    .with_timezone("UTC".to_string());

    let chunk_index = Int32Array::from(
        records
            .iter()
            .map(|r| index_to_i32("chunk_index", r.chunk.chunk_index))
            .collect::<Result<Vec<_>>>()?,
    );
    let message_start_idx = Int32Array::from(
        records
            .iter()
            .map(|r| index_to_i32("message_start_idx", r.chunk.message_start_idx))
            .collect::<Result<Vec<_>>>()?,
    );
    let message_end_idx = Int32Array::from(
        records
            .iter()
            .map(|r| index_to_i32("message_end_idx", r.chunk.message_end_idx))
            .collect::<Result<Vec<_>>>()?,
    );

    let document = StringArray::from_iter_values(records.iter().map(|r| r.chunk.text.as_str()));
    let messages_json = StringArray::from_iter_values(
        records
            .iter()
            .map(|r| serde_json::to_string(&r.chunk.messages))
            .collect::<std::result::Result<Vec<_>, _>>()?,
    );

    let vector_values: Vec<f32> = records
        .iter()
        .flat_map(|r| r.vector.iter().copied())
        .collect();
    let vector = FixedSizeListArray::try_new(
        vector_item_field(),
        dimensions as i32,
        Arc::new(Float32Array::from(vector_values)),
        None,
    )?;

    let embedded_at = TimestampMicrosecondArray::from(
        records
            .iter()
            .map(|r| r.embedded_at.timestamp_micros())
            .collect::<Vec<_>>(),
    )
    .with_timezone("UTC".to_string());
    let model_name =
        StringArray::from_iter_values(records.iter().map(|r| r.model_name.as_str()));

    Ok(RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(id),
            Arc::new(conversation_id),
            Arc::new(conversation_title),
            Arc::new(created_at),
            Arc::new(chunk_index),
            Arc::new(message_start_idx),
            Arc::new(message_end_idx),
            Arc::new(document),
            Arc::new(messages_json),
            Arc::new(vector),
            Arc::new(embedded_at),
            Arc::new(model_name),
        ],
    )?)
}

fn string_value(batch: &RecordBatch, column: &str, row: usize) -> String {
    batch
        .column_by_name(column)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
        .map(|a| a.value(row).to_string())
        .unwrap_or_default()
}

fn index_value(batch: &RecordBatch, column: &str, row: usize) -> usize {
    batch
        .column_by_name(column)
        .and_then(|c| c.as_any().downcast_ref::<Int32Array>())
        .and_then(|a| usize::try_from(a.value(row)).ok())
        .unwrap_or(0)
}

fn timestamp_value(batch: &RecordBatch, column: &str, row: usize) -> DateTime<Utc> {
    batch
        .column_by_name(column)
        .and_then(|c| c.as_any().downcast_ref::<TimestampMicrosecondArray>())
        .and_then(|a| DateTime::from_timestamp_micros(a.value(row)))
        .unwrap_or_default()
}

/// Convert a RecordBatch row back to a ChunkRecord.
fn batch_to_record(batch: &RecordBatch, row: usize) -> Result<ChunkRecord> {
    let messages_json = string_value(batch, "messages_json", row);
    let messages: Vec<Message> = if messages_json.is_empty() {
        Vec::new()
    } else {
        serde_json::from_str(&messages_json)?
    };

    let vector = batch
        .column_by_name(VECTOR_COLUMN)
        .and_then(|c| c.as_any().downcast_ref::<FixedSizeListArray>())
        .map(|a| {
            let values = a.value(row);
            values
                .as_any()
                .downcast_ref::<Float32Array>()
                .map(|fa| fa.values().to_vec())
                .unwrap_or_default()
        })
        .unwrap_or_default();

    Ok(ChunkRecord {
        chunk: Chunk {
            text: string_value(batch, "document", row),
            conversation_id: string_value(batch, "conversation_id", row),
            conversation_title: string_value(batch, "conversation_title", row),
            created_at: timestamp_value(batch, "created_at", row),
            chunk_index: index_value(batch, "chunk_index", row),
            message_start_idx: index_value(batch, "message_start_idx", row),
            message_end_idx: index_value(batch, "message_end_idx", row),
            messages,
        },
        vector,
        embedded_at: timestamp_value(batch, "embedded_at", row),
        model_name: string_value(batch, "model_name", row),
    })
}
