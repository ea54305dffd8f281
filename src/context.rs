//! Process-level handle owning configuration, embedder and store.
//!
//! Build one [`RecallContext`] at startup, pass it to every operation and
//! call [`RecallContext::close`] on shutdown.

use std::path::Path;
use std::sync::Arc;

use inquire::Confirm;

use crate::config::RecallConfig;
use crate::embedding::{build_embedder, Embedder};
use crate::error::Result;
use crate::models::Conversation;
use crate::services::{
    Chunker, ImportService, ImportSummary, RetrievalService, SearchResult,
};
use crate::vector_store::{ChunkFilter, ConversationStore, StoreStats};

/// Proof that the caller agreed to a destructive reset.
#[derive(Debug)]
pub struct ResetConfirmation {
    _private: (),
}

impl ResetConfirmation {
    /// For non-interactive callers that confirmed by other means.
    pub fn assume_yes() -> Self {
        Self { _private: () }
    }

    /// Ask on the terminal. `None` when the user declines.
    pub fn prompt(db_path: &Path) -> Result<Option<Self>> {
        let confirmed = Confirm::new(&format!(
            "Are you sure you want to reset the database at {}?",
            db_path.display()
        ))
        .with_default(false)
        .with_help_message("All stored conversation chunks will be deleted")
        .prompt()?;

        Ok(confirmed.then(Self::assume_yes))
    }
}

pub struct RecallContext {
    config: RecallConfig,
    importer: ImportService,
    chunker: Chunker,
    store: ConversationStore,
}

impl RecallContext {
    /// Build the configured embedder and open the store.
    pub async fn open(config: RecallConfig) -> Result<Self> {
        let embedder = build_embedder(&config.embedding)?;
        Self::with_embedder(config, embedder).await
    }

    pub async fn with_embedder(config: RecallConfig, embedder: Arc<dyn Embedder>) -> Result<Self> {
        config.validate()?;
        let chunker = Chunker::new(config.chunking.clone())?;
        let importer = ImportService::new(config.import.clone());
        let store = ConversationStore::open(config.store.clone(), embedder).await?;

        Ok(Self {
            config,
            importer,
            chunker,
            store,
        })
    }

    pub fn config(&self) -> &RecallConfig {
        &self.config
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Chunk and store already-normalized conversations.
    pub async fn add_conversations(&self, conversations: &[Conversation]) -> Result<ImportSummary> {
        let chunks = self.chunker.chunk_all(conversations);
        let stored = self.store.add(&chunks).await?;

        Ok(ImportSummary {
            conversations: conversations.len(),
            chunks: stored,
            ..ImportSummary::default()
        })
    }

    pub async fn import_file(&self, path: impl AsRef<Path>) -> Result<ImportSummary> {
        let conversations = self.importer.import_file(path)?;
        let mut summary = self.add_conversations(&conversations).await?;
        summary.files_imported = 1;
        Ok(summary)
    }

    /// Import every `*.json` file in `dir`; unreadable files are reported in
    /// the summary instead of failing the batch.
    pub async fn import_directory(&self, dir: impl AsRef<Path>) -> Result<ImportSummary> {
        let imported = self.importer.import_directory(dir)?;
        let mut summary = self.add_conversations(&imported.conversations).await?;
        summary.files_imported = imported.files_imported;
        summary.skipped = imported.skipped;
        Ok(summary)
    }

    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        RetrievalService::new(&self.store).search(query, limit).await
    }

    pub async fn search_filtered(
        &self,
        query: &str,
        limit: usize,
        filter: ChunkFilter,
    ) -> Result<Vec<SearchResult>> {
        RetrievalService::new(&self.store)
            .search_filtered(query, limit, Some(filter))
            .await
    }

    pub async fn stats(&self) -> Result<StoreStats> {
        self.store.stats().await
    }

    /// Delete every stored chunk.
    pub async fn reset(&mut self, _confirmation: ResetConfirmation) -> Result<()> {
        self.store.reset().await
    }

    /// Release the store's connection.
    pub fn close(self) {
        self.store.close();
    }
}
