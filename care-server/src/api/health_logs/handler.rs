//! Health Activity Log API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{HealthLog, HealthLogCreate, HealthLogUpdate};
use shared::{AppError, AppResult, ErrorCode};

use crate::api::convert::convert_all;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models as db;

/// 读取记录并检查归属
async fn load_own(state: &ServerState, id: &str, current_user: &CurrentUser) -> AppResult<db::HealthLog> {
    let log = state.health.find_by_id(id).await?.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::HealthLogNotFound,
            format!("Health log {} not found", id),
        )
    })?;
    if log.user != current_user.id {
        return Err(AppError::permission_denied(format!(
            "Health log {} belongs to another user",
            id
        )));
    }
    Ok(log)
}

/// POST /api/health
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<HealthLogCreate>,
) -> AppResult<Json<HealthLog>> {
    let log = state.health.create(&current_user.id, payload).await?;
    tracing::debug!(user = %current_user.id, date = log.date, "Health log recorded");
    Ok(Json(log.into()))
}

/// GET /api/health - 自己的记录，日期倒序
pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<HealthLog>>> {
    let logs = state.health.find_for_user(&current_user.id).await?;
    Ok(Json(convert_all(logs)))
}

/// GET /api/health/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<HealthLog>> {
    let log = load_own(&state, &id, &current_user).await?;
    Ok(Json(log.into()))
}

/// PUT /api/health/{id}
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<HealthLogUpdate>,
) -> AppResult<Json<HealthLog>> {
    load_own(&state, &id, &current_user).await?;
    let log = state.health.update(&id, payload).await?;
    Ok(Json(log.into()))
}

/// DELETE /api/health/{id}
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    load_own(&state, &id, &current_user).await?;
    let deleted = state.health.delete(&id).await?;
    tracing::info!(health_log = %id, deleted, "Health log deleted");
    Ok(Json(deleted))
}
