//! Arrow schema definitions for LanceDB tables.

use std::sync::Arc;

use arrow_schema::{DataType, Field, Schema, TimeUnit};

pub const VECTOR_COLUMN: &str = "vector";

fn utc_timestamp() -> DataType {
    DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into()))
}

/// Item field of the fixed-size vector list.
pub fn vector_item_field() -> Arc<Field> {
    Arc::new(Field::new("item", DataType::Float32, false))
}

/// Get the Arrow schema for a conversation chunk collection.
///
/// # Arguments
/// * `dimensions` - Number of dimensions in the embedding vector (e.g., 384)
pub fn chunk_records_schema(dimensions: usize) -> Schema {
    Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("conversation_id", DataType::Utf8, false),
        Field::new("conversation_title", DataType::Utf8, false),
        Field::new("created_at", utc_timestamp(), false),
        Field::new("chunk_index", DataType::Int32, false),
        Field::new("message_start_idx", DataType::Int32, false),
        Field::new("message_end_idx", DataType::Int32, false),
        Field::new("document", DataType::Utf8, false),
        Field::new("messages_json", DataType::Utf8, false),
        Field::new(
            VECTOR_COLUMN,
            DataType::FixedSizeList(vector_item_field(), dimensions as i32),
            false,
        ),
        Field::new("embedded_at", utc_timestamp(), false),
        Field::new("model_name", DataType::Utf8, false),
    ])
}

/// Vector width of an existing table schema, if it has a vector column.
pub fn vector_dimensions(schema: &Schema) -> Option<usize> {
    match schema.field_with_name(VECTOR_COLUMN).ok()?.data_type() {
        DataType::FixedSizeList(_, size) => usize::try_from(*size).ok(),
        _ => None,
    }
}
