//! 认证 / 角色中间件

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use shared::models::UserRole;
use shared::{AppError, ErrorCode};

use crate::auth::{CurrentUser, authenticate, bearer_token};
use crate::core::ServerState;
use crate::security_log;

/// 不需要 Bearer 令牌的 API; `/api/live/ws` 升级时自行用 `?token=` 校验
const PUBLIC_API_ROUTES: &[&str] = &["/api/users/register", "/api/users/login", "/api/live/ws"];

fn is_public(req: &Request) -> bool {
    let path = req.uri().path();
    req.method() == http::Method::OPTIONS
        || !path.starts_with("/api/")
        || PUBLIC_API_ROUTES.contains(&path)
}

/// 全局认证层: 通过后把 [`CurrentUser`] 放进请求扩展
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if is_public(&req) {
        return Ok(next.run(req).await);
    }

    let user = authenticate(
        &state.jwt_service,
        bearer_token(req.headers())?,
        req.uri().path(),
    )?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// 角色门禁，挂在 [`require_auth`] 之后:
/// `.layer(middleware::from_fn_with_state(UserRole::Volunteer, require_role))`
pub async fn require_role(
    State(role): State<UserRole>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::not_authenticated)?;

    if !user.has_role(role) {
        security_log!(
            "WARN",
            "role_denied",
            user_id = user.id.clone(),
            user_role = user.role.as_str(),
            required_role = role.as_str()
        );
        return Err(AppError::with_message(
            ErrorCode::RoleRequired,
            format!("{role} role required"),
        ));
    }

    Ok(next.run(req).await)
}
