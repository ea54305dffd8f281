//! A small two-conversation export for trying the pipeline end to end.

use serde_json::{json, Value};
use std::fs;
use std::path::Path;

use crate::error::Result;

/// The sample export as a top-level JSON array.
pub fn sample_conversations() -> Value {
    json!([
        {
            "id": "sample_001",
            "created_at": "2024-01-15T10:30:00Z",
            "title": "Python Best Practices Discussion",
            "messages": [
                {
                    "role": "user",
                    "content": "What are some best practices for structuring a Python project?",
                    "timestamp": "2024-01-15T10:30:00Z"
                },
                {
                    "role": "assistant",
                    "content": "Here are some Python project best practices:\n\n1. Use a clear directory structure with separate folders for source code, tests, and documentation\n2. Include a requirements.txt or pyproject.toml for dependencies\n3. Write comprehensive tests using pytest or unittest\n4. Use virtual environments to isolate dependencies\n5. Follow PEP 8 style guidelines\n6. Include proper documentation and docstrings",
                    "timestamp": "2024-01-15T10:30:15Z"
                },
                {
                    "role": "user",
                    "content": "How should I handle configuration in Python applications?",
                    "timestamp": "2024-01-15T10:31:00Z"
                },
                {
                    "role": "assistant",
                    "content": "For configuration management:\n\n1. Use environment variables for sensitive data\n2. Use python-dotenv to load .env files\n3. Consider pydantic for type-safe configuration\n4. Separate config for different environments (dev, staging, prod)\n5. Never commit secrets to version control",
                    "timestamp": "2024-01-15T10:31:20Z"
                }
            ]
        },
        {
            "id": "sample_002",
            "created_at": "2024-01-16T14:20:00Z",
            "title": "Vector Databases Explained",
            "messages": [
                {
                    "role": "user",
                    "content": "Can you explain what vector databases are and when to use them?",
                    "timestamp": "2024-01-16T14:20:00Z"
                },
                {
                    "role": "assistant",
                    "content": "Vector databases are specialized databases designed to store and query high-dimensional vectors (embeddings). They're particularly useful for:\n\n1. Semantic search - finding similar content based on meaning\n2. RAG (Retrieval Augmented Generation) systems\n3. Recommendation systems\n4. Image/audio similarity search\n\nPopular options include LanceDB, ChromaDB, Pinecone and Qdrant.",
                    "timestamp": "2024-01-16T14:20:25Z"
                }
            ]
        }
    ])
}

/// Write the sample export, pretty-printed, creating parent directories.
pub fn write_sample_file(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(&sample_conversations())?)?;

    tracing::info!(file = %path.display(), "Wrote sample conversations");
    Ok(())
}
