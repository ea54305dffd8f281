pub mod chunker;
pub mod formatters;
pub mod import_service;
pub mod retrieval_service;

pub use chunker::{chunk_conversation, render_messages, Chunker, ChunkingConfig};
pub use formatters::{
    format_import_summary, format_search_results, format_stats, DEFAULT_PREVIEW_CHARS,
};
pub use import_service::{DirectoryImport, ImportService, ImportSummary, SkippedFile};
pub use retrieval_service::{rank_hits, RetrievalService, SearchResult};
