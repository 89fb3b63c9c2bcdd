//! CareLink 统一错误体系
//!
//! [`ErrorCode`] 是数值错误码表，[`AppError`] 携带错误码、文案与可选细节，
//! 在 HTTP 层序列化为 `{ code, message, details? }`。
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::ReminderAfterSchedule)
//!     .with_detail("reminder_at", 200)
//!     .with_detail("scheduled_at", 100);
//! assert_eq!(err.http_status().as_u16(), 400);
//! assert_eq!(err.body()["code"], 3002);
//! ```

mod codes;
mod types;

pub use codes::{Domain, ErrorCode, UnknownErrorCode};
pub use types::{AppError, AppResult};
