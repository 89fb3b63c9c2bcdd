//! Emergency Alert Model

use serde::{Deserialize, Serialize};

/// Emergency alert entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyAlert {
    pub id: Option<String>,
    pub triggered_by: String,
    pub latitude: f64,
    pub longitude: f64,
    pub message: Option<String>,
    pub acknowledged: bool,
    pub acknowledged_by: Option<String>,
    pub created_at: i64,
}

/// Trigger payload (caller is the one in trouble)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyTrigger {
    pub latitude: f64,
    pub longitude: f64,
    pub message: Option<String>,
}
