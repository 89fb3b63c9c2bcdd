//! Voice Command Model

use serde::{Deserialize, Serialize};

/// Transcribed voice command, stored as history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceCommand {
    pub id: Option<String>,
    pub user: String,
    pub command_text: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceCommandCreate {
    pub command_text: String,
}
