//! Chat API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{ChatMessage, ChatMessageCreate, ChatRoom, ChatRoomCreate};
use shared::{AppError, AppResult, ErrorCode, ServerEvent};

use crate::api::convert::convert_all;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models as db;

/// 读取聊天室并检查 `user_id` 是否为参与者
pub(crate) async fn load_room_for(
    state: &ServerState,
    room_id: &str,
    user_id: &str,
) -> AppResult<db::ChatRoom> {
    let room = state.chat.find_room(room_id).await?.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::ChatRoomNotFound,
            format!("Chat room {} not found", room_id),
        )
    })?;
    if !room.is_participant(user_id) {
        return Err(AppError::with_message(
            ErrorCode::NotRoomParticipant,
            format!("Not a participant of chat room {}", room_id),
        ));
    }
    Ok(room)
}

/// 保存消息并推送给房间
///
/// HTTP 和 WebSocket 共用
pub(crate) async fn post_message(
    state: &ServerState,
    sender: &str,
    room_id: &str,
    message: &str,
) -> AppResult<ChatMessage> {
    if message.trim().is_empty() {
        return Err(AppError::new(ErrorCode::ChatMessageEmpty));
    }
    load_room_for(state, room_id, sender).await?;

    let saved: ChatMessage = state
        .chat
        .create_message(room_id, sender, message)
        .await?
        .into();

    tracing::debug!(room = %saved.room, sender = %sender, "Chat message stored");
    state
        .hub
        .to_room(saved.room.clone(), ServerEvent::ChatMessage(saved.clone()));
    Ok(saved)
}

/// POST /api/chat/rooms - 创建聊天室 (当前用户自动加入)
pub async fn create_room(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<ChatRoomCreate>,
) -> AppResult<Json<ChatRoom>> {
    for participant in &payload.participants {
        let participant = participant.trim();
        if participant.is_empty() {
            return Err(AppError::validation("participants must not contain empty ids")
                .with_detail("field", "participants"));
        }
        if state.users.find_by_id(participant).await?.is_none() {
            return Err(AppError::with_message(
                ErrorCode::UserNotFound,
                format!("Participant {} not found", participant),
            )
            .with_detail("field", "participants"));
        }
    }

    let room = state.chat.create_room(&current_user.id, payload).await?;
    tracing::info!(
        room_id = ?room.id,
        participants = room.participants.len(),
        "Chat room created"
    );
    Ok(Json(room.into()))
}

/// GET /api/chat/rooms - 当前用户参与的聊天室
pub async fn list_rooms(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<ChatRoom>>> {
    let rooms = state.chat.rooms_for_user(&current_user.id).await?;
    Ok(Json(convert_all(rooms)))
}

/// POST /api/chat/message - 发送消息
pub async fn send_message(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<ChatMessageCreate>,
) -> AppResult<Json<ChatMessage>> {
    let saved = post_message(&state, &current_user.id, &payload.room, &payload.message).await?;
    Ok(Json(saved))
}

/// GET /api/chat/rooms/{id} - 房间消息，按时间升序
pub async fn room_messages(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<ChatMessage>>> {
    load_room_for(&state, &id, &current_user.id).await?;
    let messages = state.chat.messages_for_room(&id).await?;
    Ok(Json(convert_all(messages)))
}
