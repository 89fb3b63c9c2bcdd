//! Prescription Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prescription {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    /// 患者 "user:xyz"
    pub user: String,
    pub prescribed_by: String,
    pub medication_name: String,
    pub dosage: String,
    pub frequency: String,
    pub start_date: i64,
    #[serde(default)]
    pub end_date: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: i64,
}
