//! Task Repository

use async_trait::async_trait;
use serde_json::json;
use shared::models::{TaskCreate, TaskStatus};
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, qualified_id, record_id};
use crate::db::models::Task;
use crate::scheduler::TaskStore;
use crate::utils::validation::{
    MAX_NOTE_LEN, MAX_TITLE_LEN, validate_optional_text, validate_required_text,
};

const TABLE: &str = "task";

#[derive(Clone)]
pub struct TaskRepository {
    base: BaseRepository,
}

impl TaskRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a task owned by `created_by`
    ///
    /// `reminder_at` must not be after `scheduled_at`; every create path goes through here.
    pub async fn create(&self, created_by: &str, data: TaskCreate) -> RepoResult<Task> {
        let title = data.title.trim();
        if title.is_empty() {
            return Err(RepoError::Validation("title must not be empty".into()));
        }
        validate_required_text(title, "title", MAX_TITLE_LEN)
            .map_err(|e| RepoError::Validation(e.message))?;
        validate_optional_text(&data.description, "description", MAX_NOTE_LEN)
            .map_err(|e| RepoError::Validation(e.message))?;
        if data.reminder_at > data.scheduled_at {
            return Err(RepoError::Validation(format!(
                "reminder_at ({}) must not be after scheduled_at ({})",
                data.reminder_at, data.scheduled_at
            )));
        }

        let now = now_millis();
        let task = Task {
            id: None,
            title: title.to_string(),
            description: data.description.filter(|d| !d.trim().is_empty()),
            scheduled_at: data.scheduled_at,
            reminder_at: data.reminder_at,
            status: TaskStatus::Pending,
            created_by: created_by.to_string(),
            assigned_to: data.assigned_to.map(|a| qualified_id("user", &a)),
            created_at: now,
            updated_at: now,
        };

        let created: Option<Task> = self.base.db().create(TABLE).content(task).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create task".to_string()))
    }

    /// Find task by id ("task:abc" or "abc")
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Task>> {
        let task: Option<Task> = self.base.db().select(record_id(TABLE, id)).await?;
        Ok(task)
    }

    /// Tasks created by or assigned to the user, soonest first
    pub async fn find_for_user(&self, user_id: &str) -> RepoResult<Vec<Task>> {
        let tasks: Vec<Task> = self
            .base
            .db()
            .query(
                "SELECT * FROM task WHERE created_by = $user OR assigned_to = $user \
                 ORDER BY scheduled_at ASC",
            )
            .bind(("user", user_id.to_string()))
            .await?
            .take(0)?;
        Ok(tasks)
    }

    /// PENDING tasks nobody has accepted yet
    pub async fn find_unassigned(&self) -> RepoResult<Vec<Task>> {
        let tasks: Vec<Task> = self
            .base
            .db()
            .query(
                "SELECT * FROM task WHERE status = 'PENDING' \
                 AND (assigned_to = NONE OR assigned_to = NULL) \
                 ORDER BY scheduled_at ASC",
            )
            .await?
            .take(0)?;
        Ok(tasks)
    }

    /// Set the status; the only path that changes it
    pub async fn update_status(&self, id: &str, status: TaskStatus) -> RepoResult<Task> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing MERGE $data RETURN AFTER")
            .bind(("thing", record_id(TABLE, id)))
            .bind((
                "data",
                json!({ "status": status.as_str(), "updated_at": now_millis() }),
            ))
            .await?;
        let updated: Vec<Task> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Task {} not found", id)))
    }

    /// Assign the task to `assignee` if it is PENDING and has no assignee yet
    ///
    /// The condition is part of the UPDATE so two concurrent accepts cannot both win.
    /// Assigned → `Duplicate`, no longer PENDING → `Validation`.
    pub async fn assign(&self, id: &str, assignee: &str) -> RepoResult<Task> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $thing SET assigned_to = $assignee, updated_at = $now \
                 WHERE (assigned_to = NONE OR assigned_to = NULL) AND status = 'PENDING' \
                 RETURN AFTER",
            )
            .bind(("thing", record_id(TABLE, id)))
            .bind(("assignee", assignee.to_string()))
            .bind(("now", now_millis()))
            .await?;
        let updated: Vec<Task> = result.take(0)?;
        if let Some(task) = updated.into_iter().next() {
            return Ok(task);
        }

        match self.find_by_id(id).await? {
            Some(task) if task.assigned_to.is_some() => Err(RepoError::Duplicate(format!(
                "Task {} is already assigned",
                id
            ))),
            Some(task) => Err(RepoError::Validation(format!(
                "Task {} is {}, only PENDING tasks can be accepted",
                id,
                task.status.as_str()
            ))),
            None => Err(RepoError::NotFound(format!("Task {} not found", id))),
        }
    }

    /// Hard delete a task
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let deleted: Option<Task> = self.base.db().delete(record_id(TABLE, id)).await?;
        Ok(deleted.is_some())
    }
}

#[async_trait]
impl TaskStore for TaskRepository {
    async fn find_due(&self, now: i64) -> RepoResult<Vec<Task>> {
        let tasks: Vec<Task> = self
            .base
            .db()
            .query(
                "SELECT * FROM task WHERE status = 'PENDING' AND reminder_at <= $now \
                 ORDER BY reminder_at ASC",
            )
            .bind(("now", now))
            .await?
            .take(0)?;
        Ok(tasks)
    }
}
