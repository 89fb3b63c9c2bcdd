//! Prescription Model

use serde::{Deserialize, Serialize};

/// Medication schedule recorded for a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prescription {
    pub id: Option<String>,
    /// patient, "user:xyz"
    pub user: String,
    pub prescribed_by: String,
    pub medication_name: String,
    pub dosage: String,
    pub frequency: String,
    pub start_date: i64,
    pub end_date: Option<i64>,
    pub notes: Option<String>,
    pub created_at: i64,
}

/// Create payload; `user_id` is the patient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrescriptionCreate {
    pub user_id: String,
    pub medication_name: String,
    pub dosage: String,
    pub frequency: String,
    pub start_date: i64,
    pub end_date: Option<i64>,
    pub notes: Option<String>,
}
