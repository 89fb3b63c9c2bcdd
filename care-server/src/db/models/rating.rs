//! Rating Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub rater: String,
    pub rated_user: String,
    pub value: u8,
    #[serde(default)]
    pub comment: Option<String>,
    pub created_at: i64,
}
