//! User API Handlers

use axum::{Json, extract::State};
use shared::models::{LoginRequest, LoginResponse, RegisterRequest, User};
use shared::{AppError, AppResult};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::RepoError;
use crate::security_log;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_PASSWORD_LEN, validate_email, validate_optional_text, validate_password,
    validate_required_text,
};

/// POST /api/users/register - 注册
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<User>> {
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;
    validate_required_text(&payload.first_name, "first_name", MAX_NAME_LEN)?;
    validate_required_text(&payload.last_name, "last_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.address, "address", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.phone_number, "phone_number", MAX_NAME_LEN)?;

    let user = state.users.create(payload).await.map_err(|e| match e {
        RepoError::Duplicate(msg) => {
            AppError::with_message(shared::ErrorCode::EmailAlreadyRegistered, msg)
        }
        other => other.into(),
    })?;

    tracing::info!(user_id = ?user.id, role = %user.role, "User registered");
    Ok(Json(user.into()))
}

/// POST /api/users/login - 登录
///
/// 账号不存在和密码错误返回同一个错误
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    validate_required_text(&payload.email, "email", MAX_EMAIL_LEN)?;
    validate_required_text(&payload.password, "password", MAX_PASSWORD_LEN)?;

    let user = match state.users.find_by_email(&payload.email).await? {
        Some(user) => user,
        None => {
            security_log!(
                "WARN",
                "login_failed",
                email = payload.email.clone(),
                reason = "unknown_email"
            );
            return Err(AppError::invalid_credentials());
        }
    };

    let valid = user
        .verify_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Stored password hash is unreadable: {e}")))?;
    if !valid {
        security_log!(
            "WARN",
            "login_failed",
            email = user.email.clone(),
            reason = "bad_password"
        );
        return Err(AppError::invalid_credentials());
    }

    let user_id = user
        .id
        .as_ref()
        .map(|id| id.to_string())
        .ok_or_else(|| AppError::internal("User record has no id"))?;

    let jwt = state.get_jwt_service();
    let token = jwt
        .issue(&CurrentUser {
            id: user_id.clone(),
            email: user.email.clone(),
            role: user.role,
        })
        .map_err(|e| AppError::internal(e.to_string()))?;

    tracing::info!(user_id = %user_id, "User logged in");

    Ok(Json(LoginResponse {
        token,
        expires_in: jwt.ttl_seconds(),
        user: user.into(),
    }))
}

/// GET /api/users/me - 当前用户资料
pub async fn me(State(state): State<ServerState>, current_user: CurrentUser) -> AppResult<Json<User>> {
    let user = state
        .users
        .find_by_id(&current_user.id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                shared::ErrorCode::UserNotFound,
                format!("User {} not found", current_user.id),
            )
        })?;
    Ok(Json(user.into()))
}
