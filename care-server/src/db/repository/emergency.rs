//! Emergency Alert Repository

use serde_json::json;
use shared::models::EmergencyTrigger;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::EmergencyAlert;
use crate::utils::validation::validate_coordinates;

const TABLE: &str = "emergency_alert";

#[derive(Clone)]
pub struct EmergencyRepository {
    base: BaseRepository,
}

impl EmergencyRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(
        &self,
        triggered_by: &str,
        data: EmergencyTrigger,
    ) -> RepoResult<EmergencyAlert> {
        validate_coordinates(data.latitude, data.longitude)
            .map_err(|e| RepoError::Validation(e.message))?;

        let alert = EmergencyAlert {
            id: None,
            triggered_by: triggered_by.to_string(),
            latitude: data.latitude,
            longitude: data.longitude,
            message: data.message.filter(|m| !m.trim().is_empty()),
            acknowledged: false,
            acknowledged_by: None,
            created_at: now_millis(),
        };

        let created: Option<EmergencyAlert> = self.base.db().create(TABLE).content(alert).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create emergency alert".to_string()))
    }

    /// Unacknowledged alerts, newest first
    pub async fn find_unacknowledged(&self) -> RepoResult<Vec<EmergencyAlert>> {
        let alerts: Vec<EmergencyAlert> = self
            .base
            .db()
            .query(
                "SELECT * FROM emergency_alert WHERE acknowledged = false \
                 ORDER BY created_at DESC",
            )
            .await?
            .take(0)?;
        Ok(alerts)
    }

    pub async fn acknowledge(&self, id: &str, acknowledged_by: &str) -> RepoResult<EmergencyAlert> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing MERGE $data RETURN AFTER")
            .bind(("thing", record_id(TABLE, id)))
            .bind((
                "data",
                json!({ "acknowledged": true, "acknowledged_by": acknowledged_by }),
            ))
            .await?;
        let updated: Vec<EmergencyAlert> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Emergency alert {} not found", id)))
    }
}
