//! Rating Repository

use shared::models::{RatingCreate, RatingSummary};
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, qualified_id};
use crate::db::models::Rating;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};

const TABLE: &str = "rating";

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// Mean of the values, `{0, 0}` for none
pub fn summarize(values: &[i64]) -> RatingSummary {
    if values.is_empty() {
        return RatingSummary::default();
    }
    let total: i64 = values.iter().sum();
    RatingSummary {
        average: total as f64 / values.len() as f64,
        count: values.len() as u64,
    }
}

#[derive(Clone)]
pub struct RatingRepository {
    base: BaseRepository,
}

impl RatingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Range and self-rating are rejected by the handler with their own codes
    pub async fn create(&self, rater: &str, data: RatingCreate) -> RepoResult<Rating> {
        validate_optional_text(&data.comment, "comment", MAX_NOTE_LEN)
            .map_err(|e| RepoError::Validation(e.message))?;

        let rating = Rating {
            id: None,
            rater: rater.to_string(),
            rated_user: qualified_id("user", data.rated_user_id.trim()),
            value: data.value,
            comment: data.comment.filter(|c| !c.trim().is_empty()),
            created_at: now_millis(),
        };

        let created: Option<Rating> = self.base.db().create(TABLE).content(rating).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create rating".to_string()))
    }

    pub async fn summary_for(&self, user_id: &str) -> RepoResult<RatingSummary> {
        let ratings: Vec<Rating> = self
            .base
            .db()
            .query("SELECT * FROM rating WHERE rated_user = $user")
            .bind(("user", qualified_id("user", user_id)))
            .await?
            .take(0)?;
        let values: Vec<i64> = ratings.iter().map(|r| i64::from(r.value)).collect();
        Ok(summarize(&values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize() {
        assert_eq!(summarize(&[]), RatingSummary { average: 0.0, count: 0 });
        assert_eq!(summarize(&[5]), RatingSummary { average: 5.0, count: 1 });
        let summary = summarize(&[4, 5, 3, 5]);
        assert_eq!(summary.count, 4);
        assert!((summary.average - 4.25).abs() < f64::EPSILON);
    }
}
