//! Check-in API Handlers

use axum::{Json, extract::State};
use shared::AppResult;
use shared::models::{CheckIn, CheckInCreate};

use crate::api::convert::convert_all;
use crate::auth::CurrentUser;
use crate::core::ServerState;

/// POST /api/checkin - 报平安 (时间取服务器时钟)
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<CheckInCreate>,
) -> AppResult<Json<CheckIn>> {
    let check_in = state.check_ins.create(&current_user.id, payload).await?;
    tracing::info!(
        user = %current_user.id,
        latitude = check_in.latitude,
        longitude = check_in.longitude,
        "User checked in"
    );
    Ok(Json(check_in.into()))
}

/// GET /api/checkin - 自己的签到记录，最新的在前
pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<CheckIn>>> {
    let check_ins = state.check_ins.find_for_user(&current_user.id).await?;
    Ok(Json(convert_all(check_ins)))
}
