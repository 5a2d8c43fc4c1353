use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Assistant,
    ToolOutput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub role: Role,
    pub text: String,
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
}

impl ConversationEntry {
    pub(crate) fn new(role: Role, text: String, sequence: u64) -> Self {
        Self {
            role,
            text,
            sequence,
            timestamp: Utc::now(),
        }
    }
}
