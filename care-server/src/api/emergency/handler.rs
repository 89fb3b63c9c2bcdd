//! Emergency API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{EmergencyAlert, EmergencyTrigger};
use shared::{AppError, AppResult, ErrorCode, ServerEvent};

use crate::api::convert::convert_all;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::RepoError;

/// POST /api/emergency/trigger - 触发紧急报警，推送给所有在线用户
pub async fn trigger(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<EmergencyTrigger>,
) -> AppResult<Json<EmergencyAlert>> {
    let alert: EmergencyAlert = state
        .emergency
        .create(&current_user.id, payload)
        .await?
        .into();

    tracing::warn!(
        alert_id = ?alert.id,
        triggered_by = %current_user.id,
        latitude = alert.latitude,
        longitude = alert.longitude,
        "Emergency alert triggered"
    );

    let receivers = state
        .hub
        .to_everyone(ServerEvent::EmergencyAlert(alert.clone()));
    tracing::debug!(receivers, "Emergency alert broadcast");

    Ok(Json(alert))
}

/// GET /api/emergency - 未确认的报警，最新的在前
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<EmergencyAlert>>> {
    let alerts = state.emergency.find_unacknowledged().await?;
    Ok(Json(convert_all(alerts)))
}

/// PATCH /api/emergency/{id}/acknowledge - 确认报警
pub async fn acknowledge(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<EmergencyAlert>> {
    let alert = state
        .emergency
        .acknowledge(&id, &current_user.id)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::AlertNotFound, msg),
            other => other.into(),
        })?;

    tracing::info!(alert_id = %id, by = %current_user.id, "Emergency alert acknowledged");
    Ok(Json(alert.into()))
}
