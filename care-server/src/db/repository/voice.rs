//! Voice Command Repository

use shared::models::VoiceCommandCreate;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::VoiceCommand;
use crate::utils::validation::{MAX_MESSAGE_LEN, validate_required_text};

const TABLE: &str = "voice_command";

#[derive(Clone)]
pub struct VoiceRepository {
    base: BaseRepository,
}

impl VoiceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, user: &str, data: VoiceCommandCreate) -> RepoResult<VoiceCommand> {
        validate_required_text(&data.command_text, "command_text", MAX_MESSAGE_LEN)
            .map_err(|e| RepoError::Validation(e.message))?;

        let command = VoiceCommand {
            id: None,
            user: user.to_string(),
            command_text: data.command_text.trim().to_string(),
            created_at: now_millis(),
        };

        let created: Option<VoiceCommand> = self.base.db().create(TABLE).content(command).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create voice command".to_string()))
    }

    /// History, newest first
    pub async fn find_for_user(&self, user_id: &str) -> RepoResult<Vec<VoiceCommand>> {
        let commands: Vec<VoiceCommand> = self
            .base
            .db()
            .query("SELECT * FROM voice_command WHERE user = $user ORDER BY created_at DESC")
            .bind(("user", user_id.to_string()))
            .await?
            .take(0)?;
        Ok(commands)
    }
}
