//! Environment variable constants used throughout the crate
//!
//! All environment variable names live here so configuration overrides stay
//! consistent between the config loader and the logging setup.

/// Logging configuration
pub mod logging {
    /// Log level configuration (e.g., "debug", "info", "warn", "error")
    pub const LOG_LEVEL: &str = "CHAT_RECALL_LOG_LEVEL";

    /// Log file path for file-based logging
    pub const LOG_FILE: &str = "CHAT_RECALL_LOG_FILE";

    /// Disable colored output (follows the NO_COLOR standard)
    pub const NO_COLOR: &str = "NO_COLOR";
}

/// Store configuration
pub mod store {
    /// Directory of the LanceDB database
    pub const DB_PATH: &str = "CHAT_RECALL_DB_PATH";

    /// Collection (table) name inside the database
    pub const COLLECTION: &str = "CHAT_RECALL_COLLECTION";
}

/// Embedding configuration
pub mod embedding {
    /// Embedding backend: "fastembed" or "hashing"
    pub const PROVIDER: &str = "CHAT_RECALL_EMBEDDING_PROVIDER";

    /// Embedding model name (e.g., "all-minilm-l6-v2")
    pub const MODEL: &str = "CHAT_RECALL_EMBEDDING_MODEL";

    /// Directory where downloaded models are cached
    pub const MODEL_CACHE: &str = "CHAT_RECALL_MODEL_CACHE";
}
