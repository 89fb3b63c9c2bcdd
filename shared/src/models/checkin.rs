//! Check-in Model

use serde::{Deserialize, Serialize};

/// "I am here and fine" location ping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckIn {
    pub id: Option<String>,
    pub user: String,
    pub latitude: f64,
    pub longitude: f64,
    pub check_in_time: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInCreate {
    pub latitude: f64,
    pub longitude: f64,
}
