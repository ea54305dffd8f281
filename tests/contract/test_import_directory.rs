use std::fs;
use std::path::Path;
use std::sync::Arc;

use chat_recall::embedding::HashingEmbedder;
use chat_recall::normalizer::NormalizerConfig;
use chat_recall::services::ImportService;
use chat_recall::{RecallConfig, RecallContext, RecallError, StoreConfig};
use serde_json::json;
use tempfile::TempDir;

fn write_json(dir: &Path, name: &str, value: serde_json::Value) {
    fs::write(dir.join(name), serde_json::to_string_pretty(&value).unwrap()).unwrap();
}

fn conversation(id: &str, messages: usize) -> serde_json::Value {
    let messages: Vec<_> = (0..messages)
        .map(|i| json!({"role": if i % 2 == 0 { "user" } else { "assistant" }, "content": format!("{id} says {i}")}))
        .collect();
    json!({"id": id, "title": format!("Title {id}"), "messages": messages})
}

fn export_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_json(dir.path(), "a.json", json!([conversation("a1", 3), conversation("a2", 5)]));
    write_json(dir.path(), "b.json", json!({"conversations": [conversation("b1", 4)]}));
    write_json(dir.path(), "c.JSON", conversation("c1", 2));
    fs::write(dir.path().join("broken.json"), "{\"id\": \"x\", \"messages\": [").unwrap();
    fs::write(dir.path().join("readme.md"), "not an export").unwrap();
    dir
}

#[test]
fn test_corrupt_file_is_skipped() {
    let dir = export_dir();
    let result = ImportService::new(NormalizerConfig::default())
        .import_directory(dir.path())
        .unwrap();

    let ids: Vec<&str> = result.conversations.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["a1", "a2", "b1", "c1"]);
    assert_eq!(result.files_imported, 3);
    assert_eq!(result.skipped.len(), 1);
    assert!(result.skipped[0].path.ends_with("broken.json"));
    assert!(!result.skipped[0].reason.is_empty());
}

#[test]
fn test_subdirectories_are_not_searched() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("nested");
    fs::create_dir(&nested).unwrap();
    write_json(&nested, "inner.json", conversation("inner", 2));
    write_json(dir.path(), "outer.json", conversation("outer", 2));

    let result = ImportService::default().import_directory(dir.path()).unwrap();

    assert_eq!(result.conversations.len(), 1);
    assert_eq!(result.conversations[0].id, "outer");
}

#[test]
fn test_fallback_indexes_restart_per_file() {
    let dir = TempDir::new().unwrap();
    write_json(dir.path(), "one.json", json!([{"title": "x"}]));
    write_json(dir.path(), "two.json", json!([{"title": "y"}]));

    let result = ImportService::default().import_directory(dir.path()).unwrap();

    assert!(result.conversations[0].id.starts_with("conv_0_"));
    assert!(result.conversations[1].id.starts_with("conv_0_"));
    assert_ne!(result.conversations[0].id, result.conversations[1].id);
}

#[test]
fn test_missing_directory() {
    let result = ImportService::default().import_directory("/no/such/export/dir");
    assert!(matches!(result, Err(RecallError::NotFound { .. })));
}

#[tokio::test]
async fn test_context_import_directory_stores_chunks() {
    let dir = export_dir();
    let db_dir = TempDir::new().unwrap();
    let config = RecallConfig {
        store: StoreConfig::new(db_dir.path().join("lancedb")),
        ..RecallConfig::default()
    };
    let context = RecallContext::with_embedder(config, Arc::new(HashingEmbedder::new(64)))
        .await
        .unwrap();

    let summary = context.import_directory(dir.path()).await.unwrap();

    // a1: 1 chunk, a2: 2, b1: 2, c1: 1
    assert_eq!(summary.conversations, 4);
    assert_eq!(summary.chunks, 6);
    assert_eq!(summary.files_imported, 3);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(context.stats().await.unwrap().total_chunks, 6);

    context.close();
}

#[tokio::test]
async fn test_reimport_is_idempotent() {
    let dir = export_dir();
    let db_dir = TempDir::new().unwrap();
    let config = RecallConfig {
        store: StoreConfig::new(db_dir.path()).with_batch_size(2),
        ..RecallConfig::default()
    };
    let context = RecallContext::with_embedder(config, Arc::new(HashingEmbedder::new(32)))
        .await
        .unwrap();

    context.import_directory(dir.path()).await.unwrap();
    let first = context.stats().await.unwrap().total_chunks;
    context.import_directory(dir.path()).await.unwrap();
    let second = context.stats().await.unwrap().total_chunks;

    assert_eq!(first, second);
    assert_eq!(first, 6);
}

#[tokio::test]
async fn test_reimport_without_ids_is_idempotent_with_content_hash() {
    let dir = TempDir::new().unwrap();
    write_json(
        dir.path(),
        "anon.json",
        json!([
            {"title": "no id", "messages": [{"role": "user", "content": "hello"}, {"role": "assistant", "content": "hi"}]}
        ]),
    );
    let db_dir = TempDir::new().unwrap();
    let config = RecallConfig {
        store: StoreConfig::new(db_dir.path()),
        ..RecallConfig::default()
    };
    let context = RecallContext::with_embedder(config, Arc::new(HashingEmbedder::new(16)))
        .await
        .unwrap();

    context.import_directory(dir.path()).await.unwrap();
    context.import_directory(dir.path()).await.unwrap();

    assert_eq!(context.stats().await.unwrap().total_chunks, 1);
}
