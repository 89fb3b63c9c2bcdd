//! Health Activity Log Repository

use serde_json::{Map, Value, json};
use shared::models::{HealthLogCreate, HealthLogUpdate};
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::HealthLog;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};

const TABLE: &str = "health_log";

fn check_sleep(hours: Option<f64>) -> RepoResult<()> {
    match hours {
        Some(h) if !(0.0..=24.0).contains(&h) => Err(RepoError::Validation(format!(
            "sleep_hours must be between 0 and 24, got {h}"
        ))),
        _ => Ok(()),
    }
}

#[derive(Clone)]
pub struct HealthRepository {
    base: BaseRepository,
}

impl HealthRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, user: &str, data: HealthLogCreate) -> RepoResult<HealthLog> {
        check_sleep(data.sleep_hours)?;
        validate_optional_text(&data.physical_activity, "physical_activity", MAX_NOTE_LEN)
            .map_err(|e| RepoError::Validation(e.message))?;

        let now = now_millis();
        let log = HealthLog {
            id: None,
            user: user.to_string(),
            date: data.date.unwrap_or(now),
            steps: data.steps,
            sleep_hours: data.sleep_hours,
            physical_activity: data.physical_activity.filter(|a| !a.trim().is_empty()),
            created_at: now,
            updated_at: now,
        };

        let created: Option<HealthLog> = self.base.db().create(TABLE).content(log).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create health log".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<HealthLog>> {
        let log: Option<HealthLog> = self.base.db().select(record_id(TABLE, id)).await?;
        Ok(log)
    }

    /// The user's logs, most recent day first
    pub async fn find_for_user(&self, user_id: &str) -> RepoResult<Vec<HealthLog>> {
        let logs: Vec<HealthLog> = self
            .base
            .db()
            .query("SELECT * FROM health_log WHERE user = $user ORDER BY date DESC")
            .bind(("user", user_id.to_string()))
            .await?
            .take(0)?;
        Ok(logs)
    }

    pub async fn update(&self, id: &str, data: HealthLogUpdate) -> RepoResult<HealthLog> {
        check_sleep(data.sleep_hours)?;
        validate_optional_text(&data.physical_activity, "physical_activity", MAX_NOTE_LEN)
            .map_err(|e| RepoError::Validation(e.message))?;

        let mut changes = Map::new();
        if let Some(date) = data.date {
            changes.insert("date".into(), json!(date));
        }
        if let Some(steps) = data.steps {
            changes.insert("steps".into(), json!(steps));
        }
        if let Some(hours) = data.sleep_hours {
            changes.insert("sleep_hours".into(), json!(hours));
        }
        if let Some(activity) = data.physical_activity {
            changes.insert("physical_activity".into(), json!(activity.trim()));
        }
        changes.insert("updated_at".into(), json!(now_millis()));

        let mut result = self
            .base
            .db()
            .query("UPDATE $thing MERGE $data RETURN AFTER")
            .bind(("thing", record_id(TABLE, id)))
            .bind(("data", Value::Object(changes)))
            .await?;
        let updated: Vec<HealthLog> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Health log {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let deleted: Option<HealthLog> = self.base.db().delete(record_id(TABLE, id)).await?;
        Ok(deleted.is_some())
    }
}
