//! 提醒邮件投递
//!
//! 收件人: 指派人 (assigned_to) 的邮箱，否则创建者的邮箱；都查不到则跳过。

use std::sync::Arc;

use shared::util::millis_to_rfc3339;

use super::{MailTransport, OutgoingMail, RecipientDirectory};
use crate::db::models::Task;

/// Result of one reminder send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Sent { recipient: String },
    Skipped { reason: String },
    Failed { recipient: String, error: String },
}

impl DispatchOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, DispatchOutcome::Sent { .. })
    }
}

/// Renders reminder mails and hands them to the transport
#[derive(Clone)]
pub struct ReminderMailer {
    transport: Arc<dyn MailTransport>,
    directory: Arc<dyn RecipientDirectory>,
}

impl ReminderMailer {
    pub fn new(transport: Arc<dyn MailTransport>, directory: Arc<dyn RecipientDirectory>) -> Self {
        Self {
            transport,
            directory,
        }
    }

    /// Fixed-format reminder message
    pub fn render(task: &Task, recipient: &str) -> OutgoingMail {
        let description = task
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or("No Description");

        let body = format!(
            "Hello! This is a reminder to complete your task: \"{title}\".\n\
             \n\
             Task details:\n\
             Description: {description}\n\
             Scheduled At: {scheduled}\n\
             Reminder At: {reminder}\n\
             \n\
             Please ensure it's done before it's missed!\n",
            title = task.title,
            scheduled = millis_to_rfc3339(task.scheduled_at),
            reminder = millis_to_rfc3339(task.reminder_at),
        );

        OutgoingMail {
            to: recipient.to_string(),
            subject: format!("Reminder: {}", task.title),
            body,
        }
    }

    /// Assignee email, else creator email
    ///
    /// Directory errors count as "not resolvable" so one bad lookup never fails the tick.
    pub async fn resolve_recipient(&self, task: &Task) -> Option<String> {
        let candidates = task
            .assigned_to
            .iter()
            .chain(std::iter::once(&task.created_by));

        for user_id in candidates {
            match self.directory.email_of(user_id).await {
                Ok(Some(email)) if !email.trim().is_empty() => return Some(email),
                Ok(_) => {
                    tracing::debug!(task_id = %task.id_string(), user_id = %user_id, "No email on record");
                }
                Err(e) => {
                    tracing::warn!(
                        task_id = %task.id_string(),
                        user_id = %user_id,
                        error = %e,
                        "Recipient lookup failed"
                    );
                }
            }
        }
        None
    }

    /// Send the reminder to an already resolved address
    pub async fn send_reminder(&self, task: &Task, recipient: &str) -> DispatchOutcome {
        let mail = Self::render(task, recipient);
        match self.transport.send(&mail).await {
            Ok(()) => {
                tracing::info!(
                    task_id = %task.id_string(),
                    recipient = %recipient,
                    "Reminder email sent"
                );
                DispatchOutcome::Sent {
                    recipient: recipient.to_string(),
                }
            }
            Err(e) => {
                tracing::error!(
                    task_id = %task.id_string(),
                    recipient = %recipient,
                    error = %e,
                    "Error sending reminder email"
                );
                DispatchOutcome::Failed {
                    recipient: recipient.to_string(),
                    error: e.to_string(),
                }
            }
        }
    }

    /// Resolve the recipient and send; never returns an error
    pub async fn dispatch(&self, task: &Task) -> DispatchOutcome {
        match self.resolve_recipient(task).await {
            Some(recipient) => self.send_reminder(task, &recipient).await,
            None => {
                tracing::warn!(
                    task_id = %task.id_string(),
                    created_by = %task.created_by,
                    assigned_to = ?task.assigned_to,
                    "Reminder skipped: no recipient email"
                );
                DispatchOutcome::Skipped {
                    reason: "no recipient email for assignee or creator".to_string(),
                }
            }
        }
    }
}
