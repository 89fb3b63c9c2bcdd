//! 认证与授权
//!
//! HTTP 请求走 `Authorization: Bearer <jwt>`，WebSocket 升级走 `?token=<jwt>`，
//! 两条路径最终都由 [`authenticate`] 校验。

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_auth, require_role};

use http::HeaderMap;
use shared::AppError;

use crate::security_log;

/// 取出 Bearer 令牌; 没有 Authorization 头返回 `Ok(None)`
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AppError> {
    let Some(value) = headers.get(http::header::AUTHORIZATION) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(Some)
        .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))
}

/// 校验令牌并记录安全日志; `origin` 写入日志便于定位入口
pub(crate) fn authenticate(
    jwt: &JwtService,
    token: Option<&str>,
    origin: &str,
) -> Result<CurrentUser, AppError> {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        security_log!("WARN", "auth_missing", uri = origin.to_string());
        return Err(AppError::not_authenticated());
    };

    jwt.verify(token).map_err(|e| {
        security_log!(
            "WARN",
            "auth_failed",
            error = e.to_string(),
            uri = origin.to_string()
        );
        match e {
            JwtError::Expired => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid token"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use shared::ErrorCode;

    #[test]
    fn bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers).unwrap(), None);

        headers.insert(http::header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers).unwrap(), Some("abc"));

        headers.insert(http::header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers).unwrap_err().code, ErrorCode::TokenInvalid);
    }

    #[test]
    fn missing_token_is_not_authenticated() {
        let jwt = JwtService::new(&JwtConfig {
            secret: "0123456789abcdef0123456789abcdef".to_string(),
            expiration_minutes: 60,
            issuer: "carelink".to_string(),
            audience: "carelink-clients".to_string(),
        });
        let err = authenticate(&jwt, Some(""), "/api/live/ws").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);
    }
}
