use serde::{Deserialize, Serialize};

/// Canonical speaker of a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
    Unknown,
}

/// Source role names accepted for each canonical role, compared
/// case-insensitively.
const ROLE_ALIASES: &[(Role, &[&str])] = &[
    (Role::User, &["user", "human"]),
    (
        Role::Assistant,
        &["assistant", "claude", "ai", "model", "bot", "chatgpt"],
    ),
    (Role::System, &["system", "developer"]),
];

impl Role {
    /// Map a source role string; unrecognized names become `Unknown`.
    pub fn from_source(value: &str) -> Self {
        let value = value.trim().to_lowercase();
        ROLE_ALIASES
            .iter()
            .find(|(_, aliases)| aliases.contains(&value.as_str()))
            .map(|(role, _)| *role)
            .unwrap_or(Role::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
            Role::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "User"),
            Role::Assistant => write!(f, "Assistant"),
            Role::System => write!(f, "System"),
            Role::Unknown => write!(f, "Unknown"),
        }
    }
}

/// One normalized message. `timestamp` is carried exactly as the source
/// wrote it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }
}
