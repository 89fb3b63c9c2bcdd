//! Grocery Order Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::GroceryStatus;
use surrealdb::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroceryOrder {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub user: String,
    #[serde(default)]
    pub assigned_to: Option<String>,
    pub items: Value,
    #[serde(default)]
    pub status: GroceryStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl GroceryOrder {
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }

    /// Requester plus the volunteer, if any
    pub fn stakeholders(&self) -> Vec<String> {
        let mut users = vec![self.user.clone()];
        if let Some(assignee) = &self.assigned_to
            && assignee != &self.user
        {
            users.push(assignee.clone());
        }
        users
    }
}
