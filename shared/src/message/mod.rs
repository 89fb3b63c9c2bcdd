//! Real-time message envelope
//!
//! Server → client frames are `{"event": <name>, "data": <payload>}`,
//! client → server frames are tagged by `type`.

use serde::{Deserialize, Serialize};

use crate::models::{ChatMessage, EmergencyAlert, GroceryOrder, Task};

/// Payload of a `reminderSent` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSent {
    pub task_id: String,
    pub title: String,
    pub recipient: String,
    pub sent_at: i64,
}

/// 服务端推送事件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// First frame after a successful upgrade
    Ready { user_id: String },
    ChatMessage(ChatMessage),
    EmergencyAlert(EmergencyAlert),
    ReminderSent(ReminderSent),
    TaskUpdated(Task),
    GroceryUpdated(GroceryOrder),
    /// Command rejected (bad frame, not a participant, ...)
    Error { message: String },
}

impl ServerEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Ready { .. } => "ready",
            ServerEvent::ChatMessage(_) => "chatMessage",
            ServerEvent::EmergencyAlert(_) => "emergencyAlert",
            ServerEvent::ReminderSent(_) => "reminderSent",
            ServerEvent::TaskUpdated(_) => "taskUpdated",
            ServerEvent::GroceryUpdated(_) => "groceryUpdated",
            ServerEvent::Error { .. } => "error",
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ServerEvent::Error {
            message: message.into(),
        }
    }
}

/// 客户端指令
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientCommand {
    JoinRoom { room: String },
    LeaveRoom { room: String },
    ChatMessage { room: String, message: String },
}
