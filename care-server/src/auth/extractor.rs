//! `CurrentUser` 作为 handler 参数
//!
//! 正常情况下 [`require_auth`](super::require_auth) 已经放好扩展；
//! 没有经过认证层的路由在这里补校验。

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use shared::AppError;

use crate::auth::{CurrentUser, authenticate, bearer_token};
use crate::core::ServerState;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let user = authenticate(
            &state.jwt_service,
            bearer_token(&parts.headers)?,
            parts.uri.path(),
        )?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
