//! Plain-text rendering of search results, stats and import summaries.

use super::import_service::ImportSummary;
use super::retrieval_service::SearchResult;
use crate::vector_store::StoreStats;

pub const DEFAULT_PREVIEW_CHARS: usize = 300;

const HEADER_WIDTH: usize = 80;
const SEPARATOR_WIDTH: usize = 76;

/// Cut `text` to at most `max_chars` characters, marking the cut with `...`.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}

pub fn format_search_results(query: &str, results: &[SearchResult], preview_chars: usize) -> String {
    if results.is_empty() {
        return format!("No results found for: '{query}'");
    }

    let mut lines = vec![
        format!("Found {} results for: '{}'", results.len(), query),
        "=".repeat(HEADER_WIDTH),
    ];

    for result in results {
        lines.push(String::new());
        lines.push(format!("{}. {}", result.rank, result.conversation_title));
        lines.push(format!("   Created: {}", result.created_at.to_rfc3339()));
        lines.push(format!("   Relevance: {:.3}", result.score));
        lines.push(format!("   {}", "-".repeat(SEPARATOR_WIDTH)));
        lines.push(format!("   {}", preview(&result.text, preview_chars)));
    }

    lines.join("\n")
}

pub fn format_stats(stats: &StoreStats) -> String {
    [
        "Conversation Database Statistics".to_string(),
        "=".repeat(HEADER_WIDTH),
        format!("Total chunks: {}", stats.total_chunks),
        format!("Collection name: {}", stats.collection_name),
        format!("Database path: {}", stats.db_path.display()),
        format!(
            "Embedding model: {} ({} dimensions)",
            stats.model_name, stats.dimensions
        ),
        format!("Distance metric: {}", stats.distance_metric),
    ]
    .join("\n")
}

pub fn format_import_summary(summary: &ImportSummary) -> String {
    let mut lines = vec![format!(
        "Imported {} conversations ({} chunks) from {} file(s)",
        summary.conversations, summary.chunks, summary.files_imported
    )];

    for skipped in &summary.skipped {
        lines.push(format!(
            "Skipped {}: {}",
            skipped.path.display(),
            skipped.reason
        ));
    }

    lines.join("\n")
}
