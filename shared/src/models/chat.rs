//! Chat Models

use serde::{Deserialize, Serialize};

/// Chat room entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRoom {
    pub id: Option<String>,
    pub participants: Vec<String>,
    pub name: Option<String>,
    pub is_group_chat: bool,
    pub created_by: String,
    pub created_at: i64,
}

/// Create room payload; the caller is always added to `participants`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRoomCreate {
    #[serde(default)]
    pub participants: Vec<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub is_group_chat: bool,
}

/// Chat message entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Option<String>,
    pub room: String,
    pub sender: String,
    pub message: String,
    pub created_at: i64,
}

/// Send message payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageCreate {
    pub room: String,
    pub message: String,
}
