//! CareLink 错误码表
//!
//! 每个错误码在一行里同时声明数值、HTTP 状态和默认文案，
//! 千位数决定所属领域 (见 [`Domain`])。

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! error_codes {
    ($( $(#[$doc:meta])* $name:ident = $num:literal, $status:ident, $msg:literal; )+) => {
        /// Numeric error code carried in every HTTP error body
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(into = "u16", try_from = "u16")]
        #[repr(u16)]
        pub enum ErrorCode {
            $( $(#[$doc])* $name = $num, )+
        }

        impl ErrorCode {
            pub const ALL: &'static [ErrorCode] = &[$( ErrorCode::$name, )+];

            pub fn http_status(&self) -> StatusCode {
                match self {
                    $( ErrorCode::$name => StatusCode::$status, )+
                }
            }

            /// Default English message
            pub const fn message(&self) -> &'static str {
                match self {
                    $( ErrorCode::$name => $msg, )+
                }
            }
        }

        impl TryFrom<u16> for ErrorCode {
            type Error = UnknownErrorCode;

            fn try_from(raw: u16) -> Result<Self, Self::Error> {
                match raw {
                    $( $num => Ok(ErrorCode::$name), )+
                    other => Err(UnknownErrorCode(other)),
                }
            }
        }
    };
}

error_codes! {
    // 0xxx 通用
    ValidationFailed = 2, BAD_REQUEST, "Validation failed";
    NotFound = 3, NOT_FOUND, "Resource not found";
    AlreadyExists = 4, CONFLICT, "Resource already exists";
    /// Field name is reported in `details.field`
    RequiredField = 7, BAD_REQUEST, "Required field missing";

    // 1xxx 认证
    NotAuthenticated = 1001, UNAUTHORIZED, "Not authenticated";
    InvalidCredentials = 1002, UNAUTHORIZED, "Invalid email or password";
    TokenExpired = 1003, UNAUTHORIZED, "Token expired";
    TokenInvalid = 1004, UNAUTHORIZED, "Invalid token";

    // 2xxx 权限
    PermissionDenied = 2001, FORBIDDEN, "Permission denied";
    RoleRequired = 2002, FORBIDDEN, "Role required";
    NotRoomParticipant = 2003, FORBIDDEN, "Not a participant of this chat room";

    // 3xxx 任务
    TaskNotFound = 3001, NOT_FOUND, "Task not found";
    ReminderAfterSchedule = 3002, BAD_REQUEST, "Reminder time must not be after the scheduled time";
    TaskAlreadyAssigned = 3003, CONFLICT, "Task is already assigned";
    TaskNotOpen = 3004, CONFLICT, "Only pending tasks can be accepted";

    // 4xxx 紧急求助
    AlertNotFound = 4001, NOT_FOUND, "Emergency alert not found";

    // 5xxx 聊天
    ChatRoomNotFound = 5001, NOT_FOUND, "Chat room not found";
    ChatMessageEmpty = 5002, BAD_REQUEST, "Message must not be empty";

    // 6xxx 用户
    UserNotFound = 6001, NOT_FOUND, "User not found";
    EmailAlreadyRegistered = 6002, CONFLICT, "Email already registered";

    // 7xxx 社区与照护记录 (买菜、论坛、健康日志、评分)
    GroceryOrderNotFound = 7001, NOT_FOUND, "Grocery order not found";
    GroceryAlreadyAssigned = 7002, CONFLICT, "Grocery order is already assigned";
    GroceryNotOpen = 7003, CONFLICT, "Only requested grocery orders can be accepted";
    ForumPostNotFound = 7101, NOT_FOUND, "Forum post not found";
    ForumCommentNotFound = 7102, NOT_FOUND, "Forum comment not found";
    HealthLogNotFound = 7201, NOT_FOUND, "Health log not found";
    /// Accepted range is 1..=5
    RatingOutOfRange = 7301, BAD_REQUEST, "Rating must be between 1 and 5";
    SelfRating = 7302, BAD_REQUEST, "Users cannot rate themselves";

    // 9xxx 系统
    InternalError = 9001, INTERNAL_SERVER_ERROR, "Internal server error";
    DatabaseError = 9002, INTERNAL_SERVER_ERROR, "Database error";
}

/// Business domain of a code, taken from its thousands digit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    General,
    Auth,
    Permission,
    Task,
    Emergency,
    Chat,
    User,
    Care,
    System,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    pub fn domain(&self) -> Domain {
        match self.code() / 1000 {
            0 => Domain::General,
            1 => Domain::Auth,
            2 => Domain::Permission,
            3 => Domain::Task,
            4 => Domain::Emergency,
            5 => Domain::Chat,
            6 => Domain::User,
            7 => Domain::Care,
            _ => Domain::System,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Raised when decoding a number that is not in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown error code {0}")]
pub struct UnknownErrorCode(pub u16);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_code_decodes_to_itself() {
        for code in ErrorCode::ALL {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(*code));
        }
        assert_eq!(ErrorCode::try_from(4242), Err(UnknownErrorCode(4242)));
    }

    #[test]
    fn wire_form_is_a_bare_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::TaskNotFound).unwrap(), "3001");
        let code: ErrorCode = serde_json::from_str("6002").unwrap();
        assert_eq!(code, ErrorCode::EmailAlreadyRegistered);
        assert!(serde_json::from_str::<ErrorCode>("8").is_err());
    }

    #[test]
    fn domain_follows_thousands_digit() {
        assert_eq!(ErrorCode::RequiredField.domain(), Domain::General);
        assert_eq!(ErrorCode::TokenInvalid.domain(), Domain::Auth);
        assert_eq!(ErrorCode::NotRoomParticipant.domain(), Domain::Permission);
        assert_eq!(ErrorCode::ReminderAfterSchedule.domain(), Domain::Task);
        assert_eq!(ErrorCode::AlertNotFound.domain(), Domain::Emergency);
        assert_eq!(ErrorCode::ChatMessageEmpty.domain(), Domain::Chat);
        assert_eq!(ErrorCode::UserNotFound.domain(), Domain::User);
        assert_eq!(ErrorCode::GroceryAlreadyAssigned.domain(), Domain::Care);
        assert_eq!(ErrorCode::SelfRating.domain(), Domain::Care);
        assert_eq!(ErrorCode::DatabaseError.domain(), Domain::System);
    }

    #[test]
    fn status_table() {
        assert_eq!(ErrorCode::TaskNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::TaskAlreadyAssigned.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::TaskNotOpen.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::HealthLogNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::RatingOutOfRange.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::TokenExpired.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::RoleRequired.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ErrorCode::ReminderAfterSchedule.http_status(),
            StatusCode::BAD_REQUEST
        );
    }
}
