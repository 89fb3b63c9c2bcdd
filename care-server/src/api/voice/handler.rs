//! Voice Command API Handlers

use axum::{Json, extract::State};
use shared::AppResult;
use shared::models::{VoiceCommand, VoiceCommandCreate};

use crate::api::convert::convert_all;
use crate::auth::CurrentUser;
use crate::core::ServerState;

/// POST /api/voice - 保存语音指令文本
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<VoiceCommandCreate>,
) -> AppResult<Json<VoiceCommand>> {
    let command = state.voice.create(&current_user.id, payload).await?;
    tracing::debug!(user = %current_user.id, "Voice command stored");
    Ok(Json(command.into()))
}

/// GET /api/voice - 历史记录，最新的在前
pub async fn history(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<VoiceCommand>>> {
    let commands = state.voice.find_for_user(&current_user.id).await?;
    Ok(Json(convert_all(commands)))
}
