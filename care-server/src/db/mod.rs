//! Database Module
//!
//! Embedded SurrealDB (RocksDB engine): connection, schema indexes and repositories

pub mod models;
pub mod repository;

use std::path::Path;

use shared::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

pub const NAMESPACE: &str = "carelink";
pub const DATABASE: &str = "carelink";

/// 启动时定义的索引 (幂等)
const SCHEMA: &str = r#"
DEFINE INDEX IF NOT EXISTS user_email ON TABLE user FIELDS email UNIQUE;
DEFINE INDEX IF NOT EXISTS task_due ON TABLE task FIELDS status, reminder_at;
DEFINE INDEX IF NOT EXISTS task_created_by ON TABLE task FIELDS created_by;
DEFINE INDEX IF NOT EXISTS task_assigned_to ON TABLE task FIELDS assigned_to;
DEFINE INDEX IF NOT EXISTS chat_message_room ON TABLE chat_message FIELDS room, created_at;
DEFINE INDEX IF NOT EXISTS prescription_user ON TABLE prescription FIELDS user;
DEFINE INDEX IF NOT EXISTS grocery_order_open ON TABLE grocery_order FIELDS status, assigned_to;
DEFINE INDEX IF NOT EXISTS forum_comment_post ON TABLE forum_comment FIELDS post, created_at;
DEFINE INDEX IF NOT EXISTS health_log_user ON TABLE health_log FIELDS user, date;
DEFINE INDEX IF NOT EXISTS check_in_user ON TABLE check_in FIELDS user;
DEFINE INDEX IF NOT EXISTS rating_rated_user ON TABLE rating FIELDS rated_user;
DEFINE INDEX IF NOT EXISTS voice_command_user ON TABLE voice_command FIELDS user;
"#;

/// Database service: owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// 打开 (或创建) RocksDB 数据目录并应用索引定义
    pub async fn new(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::database(format!(
                    "Failed to create database directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let db = Surreal::new::<RocksDb>(path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        db.query(SCHEMA)
            .await
            .and_then(|response| response.check())
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;

        tracing::info!(path = %path.display(), "Database connection established (SurrealDB RocksDB)");

        Ok(Self { db })
    }
}
