use thiserror::Error;

/// Error types for chat-recall
#[derive(Error, Debug)]
pub enum RecallError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parsing error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Import error: {message}")]
    Import { message: String },

    #[error("Embedding error: {message}")]
    Embedding { message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] lancedb::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),

    #[error("Prompt error: {message}")]
    Prompt { message: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Unknown error: {message}")]
    Unknown { message: String },
}

impl RecallError {
    /// Create an invalid configuration error
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an import error
    pub fn import<S: Into<String>>(message: S) -> Self {
        Self::Import {
            message: message.into(),
        }
    }

    /// Create an embedding error
    pub fn embedding<S: Into<String>>(message: S) -> Self {
        Self::Embedding {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            RecallError::Io(_) => "io",
            RecallError::Json(_) => "json",
            RecallError::ConfigParse(_) | RecallError::ConfigSerialize(_) => "config",
            RecallError::InvalidConfig { .. } => "config",
            RecallError::Validation { .. } => "validation",
            RecallError::Import { .. } => "import",
            RecallError::Embedding { .. } => "embedding",
            RecallError::Storage(_) => "storage",
            RecallError::Arrow(_) => "storage",
            RecallError::Prompt { .. } => "prompt",
            RecallError::NotFound { .. } => "not_found",
            RecallError::Unknown { .. } => "unknown",
        }
    }
}

/// FastEmbed reports failures through anyhow
impl From<anyhow::Error> for RecallError {
    fn from(err: anyhow::Error) -> Self {
        RecallError::Embedding {
            message: format!("{err:#}"),
        }
    }
}

impl From<inquire::InquireError> for RecallError {
    fn from(err: inquire::InquireError) -> Self {
        RecallError::Prompt {
            message: err.to_string(),
        }
    }
}

/// Result type alias for chat-recall
pub type Result<T> = std::result::Result<T, RecallError>;
