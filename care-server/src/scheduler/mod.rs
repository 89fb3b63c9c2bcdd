//! 定时任务
//!
//! - [`TaskStore`] - 到期任务查询抽象 (生产实现: `TaskRepository`)
//! - [`ReminderScanner`] - 固定间隔扫描到期任务并投递提醒邮件

pub mod reminder_scanner;

pub use reminder_scanner::{ReminderScanner, TickReport};

use async_trait::async_trait;

use crate::db::models::Task;
use crate::db::repository::RepoResult;

/// Task source for the reminder scanner
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// PENDING tasks with `reminder_at <= now` (inclusive)
    ///
    /// Not idempotent: a task keeps being returned until its status changes.
    async fn find_due(&self, now: i64) -> RepoResult<Vec<Task>>;
}
