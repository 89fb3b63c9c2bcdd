//! 提醒扫描器
//!
//! 每个周期查询 `status = PENDING AND reminder_at <= now` 的任务，逐个投递提醒邮件。
//! 同一周期内的发送并发执行，单个失败不影响其他任务。
//!
//! 不记录"已提醒"标记：状态未改变的任务会在之后每个周期被重复选中。

use std::sync::Arc;
use std::time::Duration;

use shared::ServerEvent;
use shared::message::ReminderSent;
use shared::util::now_millis;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::TaskStore;
use crate::db::models::Task;
use crate::db::repository::RepoResult;
use crate::live::EventHub;
use crate::notify::{DispatchOutcome, ReminderMailer};

/// One tick's tally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub selected: usize,
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Interval-driven reminder job
pub struct ReminderScanner {
    store: Arc<dyn TaskStore>,
    mailer: ReminderMailer,
    hub: EventHub,
    interval: Duration,
    shutdown: CancellationToken,
}

impl ReminderScanner {
    pub fn new(
        store: Arc<dyn TaskStore>,
        mailer: ReminderMailer,
        hub: EventHub,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            store,
            mailer,
            hub,
            interval,
            shutdown,
        }
    }

    /// 主循环，直到 shutdown
    pub async fn run(self) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Reminder scanner started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = self.shutdown.cancelled() => break,
            }

            match self.tick(now_millis()).await {
                Ok(report) if report.selected > 0 => {
                    tracing::info!(
                        selected = report.selected,
                        sent = report.sent,
                        failed = report.failed,
                        skipped = report.skipped,
                        "Reminder tick finished"
                    );
                }
                Ok(_) => tracing::debug!("Reminder tick: nothing due"),
                Err(e) => {
                    tracing::error!(error = %e, "Reminder tick aborted: task query failed");
                }
            }
        }

        tracing::info!("Reminder scanner stopped");
    }

    /// One scan at `now` (Unix millis)
    ///
    /// Only the task query can fail; per-task send failures are counted in the report.
    pub async fn tick(&self, now: i64) -> RepoResult<TickReport> {
        let due = self.store.find_due(now).await?;

        let outcomes =
            futures::future::join_all(due.iter().map(|task| self.mailer.dispatch(task))).await;

        let mut report = TickReport {
            selected: due.len(),
            ..Default::default()
        };
        for (task, outcome) in due.iter().zip(outcomes) {
            match outcome {
                DispatchOutcome::Sent { recipient } => {
                    report.sent += 1;
                    self.announce(task, recipient, now);
                }
                DispatchOutcome::Failed { .. } => report.failed += 1,
                DispatchOutcome::Skipped { .. } => report.skipped += 1,
            }
        }
        Ok(report)
    }

    fn announce(&self, task: &Task, recipient: String, sent_at: i64) {
        let event = ServerEvent::ReminderSent(ReminderSent {
            task_id: task.id_string(),
            title: task.title.clone(),
            recipient,
            sent_at,
        });
        self.hub.to_users(task.stakeholders(), event);
    }
}
