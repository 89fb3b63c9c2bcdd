use super::codes::{Domain, ErrorCode};
use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde_json::{Map, Value, json};

/// 业务错误: 错误码 + 文案 + 细节
#[derive(Debug, Clone, thiserror::Error)]
#[error("[{code}] {message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<Map<String, Value>>,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Error carrying the code's default message
    pub fn new(code: ErrorCode) -> Self {
        Self::with_message(code, code.message())
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// JSON 错误体，`details` 为空时省略
    pub fn body(&self) -> Value {
        let mut body = json!({ "code": self.code, "message": self.message });
        if let Some(details) = &self.details {
            body["details"] = Value::Object(details.clone());
        }
        body
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    pub fn required_field(field: &str) -> Self {
        Self::with_message(ErrorCode::RequiredField, format!("{field} is required"))
            .with_detail("field", field)
    }

    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // 9xxx 记录到服务端日志
        if self.code.domain() == Domain::System {
            tracing::error!(code = %self.code, message = %self.message, "system error");
        }
        (self.http_status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_message_comes_from_table() {
        let err = AppError::new(ErrorCode::TaskNotFound);
        assert_eq!(err.message, "Task not found");
        assert!(err.details.is_none());
        assert_eq!(err.to_string(), "[3001] Task not found");
    }

    #[test]
    fn required_field_names_the_field() {
        let err = AppError::required_field("title");
        assert_eq!(err.message, "title is required");
        assert_eq!(err.body()["details"]["field"], "title");
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn body_omits_empty_details() {
        let body = AppError::permission_denied("Volunteer only").body();
        assert_eq!(body["code"], 2001);
        assert_eq!(body["message"], "Volunteer only");
        assert!(body.get("details").is_none());
    }

    #[test]
    fn into_response_uses_code_status() {
        let response = AppError::token_expired().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
