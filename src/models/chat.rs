use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Author of a chat turn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    // Model providers call this role "model"
    #[serde(alias = "model")]
    Assistant,
}

impl ChatRole {
    /// Role name used by the generateContent API.
    pub fn model_role(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "model",
        }
    }
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatRole::User => write!(f, "user"),
            ChatRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl std::str::FromStr for ChatRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(ChatRole::User),
            "assistant" | "model" => Ok(ChatRole::Assistant),
            _ => Err(format!("Invalid chat role: {}", s)),
        }
    }
}

/// Counts captured when a turn is sent. Informational only.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContextSnapshot {
    pub portfolio_entries: usize,
    pub tracked_coins: usize,
}

/// A persisted chat turn. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatTurn {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: ChatRole,
    pub message: String,
    pub context: ContextSnapshot,
    pub created_at: DateTime<Utc>,
}

impl ChatTurn {
    pub fn new(user_id: Uuid, role: ChatRole, message: impl Into<String>, context: ContextSnapshot) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            role,
            message: message.into(),
            context,
            created_at: Utc::now(),
        }
    }
}
