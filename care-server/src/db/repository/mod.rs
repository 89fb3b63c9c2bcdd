//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.

pub mod chat;
pub mod checkin;
pub mod emergency;
pub mod forum;
pub mod grocery;
pub mod health;
pub mod prescription;
pub mod rating;
pub mod task;
pub mod user;
pub mod voice;

// Re-exports
pub use chat::ChatRepository;
pub use checkin::CheckInRepository;
pub use emergency::EmergencyRepository;
pub use forum::ForumRepository;
pub use grocery::GroceryRepository;
pub use health::HealthRepository;
pub use prescription::PrescriptionRepository;
pub use rating::RatingRepository;
pub use task::TaskRepository;
pub use user::UserRepository;
pub use voice::VoiceRepository;

use shared::AppError;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(shared::ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => {
                AppError::with_message(shared::ErrorCode::AlreadyExists, msg)
            }
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Repository database error");
                AppError::database(msg)
            }
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
// =============================================================================
//
//   - API 路径参数同时接受 "task:abc" 与 "abc"
//   - 引用字段 (created_by, assigned_to, room, ...) 存储完整 "table:id" 字符串
//   - CRUD: 通过 record_id() 构造 RecordId 后直接 select / delete / bind

/// Strip an optional `table:` prefix from an id
pub fn strip_table_prefix<'a>(table: &str, id: &'a str) -> &'a str {
    id.strip_prefix(table)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(id)
}

/// Build a RecordId for `table` from "table:key" or a bare "key"
pub fn record_id(table: &str, id: &str) -> RecordId {
    RecordId::from_table_key(table, strip_table_prefix(table, id))
}

/// Canonical "table:key" string for an id given in either form
pub fn qualified_id(table: &str, id: &str) -> String {
    format!("{}:{}", table, strip_table_prefix(table, id))
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
