//! Rating Model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub id: Option<String>,
    pub rater: String,
    pub rated_user: String,
    /// 1..=5
    pub value: u8,
    pub comment: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingCreate {
    pub rated_user_id: String,
    pub value: u8,
    pub comment: Option<String>,
}

/// Aggregate for one user; `{0, 0}` when nobody rated them yet
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RatingSummary {
    pub average: f64,
    pub count: u64,
}
