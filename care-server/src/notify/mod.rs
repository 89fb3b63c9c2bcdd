//! 通知模块
//!
//! - [`MailTransport`] - 出站邮件传输抽象 (生产实现: [`SmtpMailer`])
//! - [`RecipientDirectory`] - user id → email 查询
//! - [`ReminderMailer`] - 渲染提醒邮件并投递，返回 [`DispatchOutcome`]

pub mod mailer;
pub mod reminder;

pub use mailer::SmtpMailer;
pub use reminder::{DispatchOutcome, ReminderMailer};

use async_trait::async_trait;
use thiserror::Error;

use crate::db::repository::RepoResult;

/// A rendered plain-text mail ready for the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// 邮件发送错误 (记录日志后吞掉，不会重试)
#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("smtp transport error: {0}")]
    Transport(String),
}

/// Outbound mail transport
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

/// Resolves a stored user id to its email address
#[async_trait]
pub trait RecipientDirectory: Send + Sync {
    async fn email_of(&self, user_id: &str) -> RepoResult<Option<String>>;
}
