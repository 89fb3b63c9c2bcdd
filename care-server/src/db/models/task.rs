//! Task Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::models::TaskStatus;
use surrealdb::RecordId;

pub type TaskId = RecordId;

/// Task record as stored in SurrealDB
///
/// `created_by` / `assigned_to` hold user ids in "user:xyz" form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<TaskId>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub scheduled_at: i64,
    pub reminder_at: i64,
    #[serde(default)]
    pub status: TaskStatus,
    pub created_by: String,
    #[serde(default)]
    pub assigned_to: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Task {
    /// "task:xyz", empty for unsaved records
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }

    /// Users that should hear about changes to this task
    pub fn stakeholders(&self) -> Vec<String> {
        let mut users = vec![self.created_by.clone()];
        if let Some(assignee) = &self.assigned_to
            && assignee != &self.created_by
        {
            users.push(assignee.clone());
        }
        users
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(assigned_to: Option<&str>) -> Task {
        Task {
            id: None,
            title: "Take pills".into(),
            description: None,
            scheduled_at: 2_000,
            reminder_at: 1_000,
            status: TaskStatus::Pending,
            created_by: "user:family".into(),
            assigned_to: assigned_to.map(String::from),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_stakeholders() {
        assert_eq!(task(None).stakeholders(), vec!["user:family"]);
        assert_eq!(
            task(Some("user:vol")).stakeholders(),
            vec!["user:family", "user:vol"]
        );
        assert_eq!(task(Some("user:family")).stakeholders(), vec!["user:family"]);
    }

    #[test]
    fn test_id_string_unsaved() {
        assert_eq!(task(None).id_string(), "");
    }
}
