//! Health Activity Log Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthLog {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub user: String,
    pub date: i64,
    #[serde(default)]
    pub steps: Option<u32>,
    #[serde(default)]
    pub sleep_hours: Option<f64>,
    #[serde(default)]
    pub physical_activity: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}
