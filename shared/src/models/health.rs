//! Health Activity Log Model

use serde::{Deserialize, Serialize};

/// One day of self-reported activity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthLog {
    pub id: Option<String>,
    pub user: String,
    /// day of the entry, Unix millis
    pub date: i64,
    pub steps: Option<u32>,
    pub sleep_hours: Option<f64>,
    pub physical_activity: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create payload; `date` defaults to now
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthLogCreate {
    pub date: Option<i64>,
    pub steps: Option<u32>,
    pub sleep_hours: Option<f64>,
    pub physical_activity: Option<String>,
}

/// Partial update; absent fields are kept
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthLogUpdate {
    pub date: Option<i64>,
    pub steps: Option<u32>,
    pub sleep_hours: Option<f64>,
    pub physical_activity: Option<String>,
}
