//! Volunteer API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use shared::models::{GroceryOrder, Task};
use shared::{AppError, AppResult, ErrorCode};

use crate::api::convert::convert_all;
use crate::api::grocery::publish_grocery_updated;
use crate::api::tasks::publish_task_updated;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::RepoError;

/// 待接的任务和代购订单
#[derive(Debug, Serialize)]
pub struct OpenRequests {
    pub tasks: Vec<Task>,
    pub groceries: Vec<GroceryOrder>,
}

/// GET /api/volunteer/unassigned - PENDING 任务 + REQUESTED 订单，均未被接受
pub async fn unassigned(State(state): State<ServerState>) -> AppResult<Json<OpenRequests>> {
    let tasks = state.tasks.find_unassigned().await?;
    let groceries = state.grocery.find_unassigned().await?;
    Ok(Json(OpenRequests {
        tasks: convert_all(tasks),
        groceries: convert_all(groceries),
    }))
}

/// PATCH /api/volunteer/accept/task/{id} - 接受任务
///
/// 已被他人接受时返回 TaskAlreadyAssigned，非 PENDING 返回 TaskNotOpen
pub async fn accept(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Task>> {
    let task = state
        .tasks
        .assign(&id, &current_user.id)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(msg) => {
                AppError::with_message(ErrorCode::TaskAlreadyAssigned, msg)
            }
            RepoError::Validation(msg) => AppError::with_message(ErrorCode::TaskNotOpen, msg),
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::TaskNotFound, msg),
            other => other.into(),
        })?;

    tracing::info!(
        task_id = %task.id_string(),
        volunteer = %current_user.id,
        "Task accepted by volunteer"
    );

    publish_task_updated(&state, &task);
    Ok(Json(task.into()))
}

/// PATCH /api/volunteer/accept/grocery/{id} - 接受代购订单 (状态变为 ACCEPTED)
pub async fn accept_grocery(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<GroceryOrder>> {
    let order = state
        .grocery
        .assign(&id, &current_user.id)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(msg) => {
                AppError::with_message(ErrorCode::GroceryAlreadyAssigned, msg)
            }
            RepoError::Validation(msg) => AppError::with_message(ErrorCode::GroceryNotOpen, msg),
            RepoError::NotFound(msg) => {
                AppError::with_message(ErrorCode::GroceryOrderNotFound, msg)
            }
            other => other.into(),
        })?;

    tracing::info!(
        order_id = %order.id_string(),
        volunteer = %current_user.id,
        "Grocery order accepted by volunteer"
    );

    publish_grocery_updated(&state, &order);
    Ok(Json(order.into()))
}
