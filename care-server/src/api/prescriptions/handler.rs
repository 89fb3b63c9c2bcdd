//! Prescription API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{Prescription, PrescriptionCreate, UserRole};
use shared::{AppError, AppResult, ErrorCode};

use crate::api::convert::convert_all;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::qualified_id;

/// 本人或家属 (FAMILY) 才能管理处方
fn ensure_can_manage(current_user: &CurrentUser, patient: &str) -> AppResult<()> {
    if current_user.id == qualified_id("user", patient) || current_user.has_role(UserRole::Family) {
        return Ok(());
    }
    Err(AppError::permission_denied(format!(
        "Cannot manage prescriptions of {}",
        patient
    )))
}

/// POST /api/prescriptions - 为患者登记处方
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<PrescriptionCreate>,
) -> AppResult<Json<Prescription>> {
    let patient = payload.user_id.trim();
    if patient.is_empty() {
        return Err(AppError::required_field("user_id"));
    }
    ensure_can_manage(&current_user, patient)?;
    if state.users.find_by_id(patient).await?.is_none() {
        return Err(AppError::with_message(
            ErrorCode::UserNotFound,
            format!("Patient {} not found", patient),
        )
        .with_detail("field", "user_id"));
    }

    let prescription = state.prescriptions.create(&current_user.id, payload).await?;
    tracing::info!(
        prescription_id = ?prescription.id,
        patient = %prescription.user,
        prescribed_by = %current_user.id,
        "Prescription recorded"
    );
    Ok(Json(prescription.into()))
}

/// GET /api/prescriptions/{user_id} - 患者的处方，最近开始的在前
pub async fn list_for_user(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<Prescription>>> {
    ensure_can_manage(&current_user, &user_id)?;
    let prescriptions = state.prescriptions.find_for_user(&user_id).await?;
    Ok(Json(convert_all(prescriptions)))
}
