use thiserror::Error;

use super::ConfigError;

/// 启动 / 运行期致命错误
///
/// 请求级错误统一使用 [`shared::AppError`]，这里只覆盖进程无法继续运行的情况
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("数据库初始化失败: {0}")]
    Database(String),

    #[error("邮件传输初始化失败: {0}")]
    Mail(#[from] crate::notify::MailError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

impl From<shared::AppError> for ServerError {
    fn from(err: shared::AppError) -> Self {
        ServerError::Database(err.message)
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
