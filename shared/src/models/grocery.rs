//! Grocery Order Model

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 买菜订单状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GroceryStatus {
    #[default]
    Requested,
    Accepted,
    Completed,
    Cancelled,
}

impl GroceryStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            GroceryStatus::Requested => "REQUESTED",
            GroceryStatus::Accepted => "ACCEPTED",
            GroceryStatus::Completed => "COMPLETED",
            GroceryStatus::Cancelled => "CANCELLED",
        }
    }
}

/// Grocery order entity
///
/// `items` is free-form JSON (a list of strings or `{name, quantity}` objects, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroceryOrder {
    pub id: Option<String>,
    /// requester, "user:xyz"
    pub user: String,
    pub assigned_to: Option<String>,
    pub items: Value,
    pub status: GroceryStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create payload (requester is the caller)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroceryOrderCreate {
    pub items: Value,
}

/// Status update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroceryStatusUpdate {
    pub status: GroceryStatus,
}
