//! Check-in Repository

use shared::models::CheckInCreate;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::CheckIn;
use crate::utils::validation::validate_coordinates;

const TABLE: &str = "check_in";

#[derive(Clone)]
pub struct CheckInRepository {
    base: BaseRepository,
}

impl CheckInRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Check-in time is always the server clock
    pub async fn create(&self, user: &str, data: CheckInCreate) -> RepoResult<CheckIn> {
        validate_coordinates(data.latitude, data.longitude)
            .map_err(|e| RepoError::Validation(e.message))?;

        let check_in = CheckIn {
            id: None,
            user: user.to_string(),
            latitude: data.latitude,
            longitude: data.longitude,
            check_in_time: now_millis(),
        };

        let created: Option<CheckIn> = self.base.db().create(TABLE).content(check_in).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create check-in".to_string()))
    }

    /// Newest first
    pub async fn find_for_user(&self, user_id: &str) -> RepoResult<Vec<CheckIn>> {
        let check_ins: Vec<CheckIn> = self
            .base
            .db()
            .query("SELECT * FROM check_in WHERE user = $user ORDER BY check_in_time DESC")
            .bind(("user", user_id.to_string()))
            .await?
            .take(0)?;
        Ok(check_ins)
    }
}
