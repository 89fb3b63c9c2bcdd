//! Chat Repository

use shared::models::ChatRoomCreate;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, qualified_id, record_id};
use crate::db::models::{ChatMessage, ChatRoom};
use crate::utils::validation::{
    MAX_MESSAGE_LEN, MAX_NAME_LEN, char_len, validate_optional_text,
};

pub const ROOM_TABLE: &str = "chat_room";
const MESSAGE_TABLE: &str = "chat_message";

#[derive(Clone)]
pub struct ChatRepository {
    base: BaseRepository,
}

impl ChatRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a room; the creator is always a participant
    ///
    /// Participants must already be known users, the handler checks that before calling.
    pub async fn create_room(&self, created_by: &str, data: ChatRoomCreate) -> RepoResult<ChatRoom> {
        validate_optional_text(&data.name, "name", MAX_NAME_LEN)
            .map_err(|e| RepoError::Validation(e.message))?;

        let mut participants = vec![created_by.to_string()];
        for p in data.participants {
            let p = p.trim();
            if p.is_empty() {
                return Err(RepoError::Validation(
                    "participants must not contain empty ids".into(),
                ));
            }
            let p = qualified_id("user", p);
            if !participants.contains(&p) {
                participants.push(p);
            }
        }

        let room = ChatRoom {
            id: None,
            is_group_chat: data.is_group_chat || participants.len() > 2,
            participants,
            name: data.name,
            created_by: created_by.to_string(),
            created_at: now_millis(),
        };

        let created: Option<ChatRoom> = self.base.db().create(ROOM_TABLE).content(room).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create chat room".to_string()))
    }

    pub async fn find_room(&self, id: &str) -> RepoResult<Option<ChatRoom>> {
        let room: Option<ChatRoom> = self.base.db().select(record_id(ROOM_TABLE, id)).await?;
        Ok(room)
    }

    /// Rooms the user participates in, newest first
    pub async fn rooms_for_user(&self, user_id: &str) -> RepoResult<Vec<ChatRoom>> {
        let rooms: Vec<ChatRoom> = self
            .base
            .db()
            .query("SELECT * FROM chat_room WHERE participants CONTAINS $user ORDER BY created_at DESC")
            .bind(("user", user_id.to_string()))
            .await?
            .take(0)?;
        Ok(rooms)
    }

    /// Persist a message; participation is checked by the caller
    pub async fn create_message(
        &self,
        room_id: &str,
        sender: &str,
        message: &str,
    ) -> RepoResult<ChatMessage> {
        let message = message.trim();
        if message.is_empty() {
            return Err(RepoError::Validation("message must not be empty".into()));
        }
        let len = char_len(message);
        if len > MAX_MESSAGE_LEN {
            return Err(RepoError::Validation(format!(
                "message is too long ({len} chars, max {MAX_MESSAGE_LEN})"
            )));
        }

        let msg = ChatMessage {
            id: None,
            room: qualified_id(ROOM_TABLE, room_id),
            sender: sender.to_string(),
            message: message.to_string(),
            created_at: now_millis(),
        };

        let created: Option<ChatMessage> =
            self.base.db().create(MESSAGE_TABLE).content(msg).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create chat message".to_string()))
    }

    /// Messages of a room, oldest first
    pub async fn messages_for_room(&self, room_id: &str) -> RepoResult<Vec<ChatMessage>> {
        let messages: Vec<ChatMessage> = self
            .base
            .db()
            .query("SELECT * FROM chat_message WHERE room = $room ORDER BY created_at ASC")
            .bind(("room", qualified_id(ROOM_TABLE, room_id)))
            .await?
            .take(0)?;
        Ok(messages)
    }
}
