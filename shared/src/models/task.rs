//! Task Model

use serde::{Deserialize, Serialize};

/// 任务状态
///
/// Reminder firing never changes the status; only explicit updates do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
    Missed,
}

impl TaskStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::Missed => "MISSED",
        }
    }
}

/// Task entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_at: i64,
    pub reminder_at: i64,
    pub status: TaskStatus,
    /// user id ("user:xyz")
    pub created_by: String,
    pub assigned_to: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create task payload (creator is the caller)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskCreate {
    pub title: String,
    pub description: Option<String>,
    pub scheduled_at: i64,
    pub reminder_at: i64,
    pub assigned_to: Option<String>,
}

/// Status update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatusUpdate {
    pub status: TaskStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::Pending).unwrap(),
            "\"PENDING\""
        );
        let update: TaskStatusUpdate = serde_json::from_str(r#"{"status":"COMPLETED"}"#).unwrap();
        assert_eq!(update.status, TaskStatus::Completed);
        assert!(serde_json::from_str::<TaskStatusUpdate>(r#"{"status":"done"}"#).is_err());
    }

    #[test]
    fn test_default_status_is_pending() {
        assert_eq!(TaskStatus::default(), TaskStatus::Pending);
        assert_eq!(TaskStatus::default().as_str(), "PENDING");
    }
}
