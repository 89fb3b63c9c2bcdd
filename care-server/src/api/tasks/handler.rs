//! Task API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{Task, TaskCreate, TaskStatusUpdate, UserRole};
use shared::{AppError, AppResult, ErrorCode, ServerEvent};

use crate::api::convert::convert_all;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models as db;

/// 读取任务，不存在时返回 TaskNotFound
async fn load_task(state: &ServerState, id: &str) -> AppResult<db::Task> {
    state.tasks.find_by_id(id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::TaskNotFound, format!("Task {} not found", id))
    })
}

/// 向创建者和指派人推送 taskUpdated
pub(crate) fn publish_task_updated(state: &ServerState, task: &db::Task) {
    state
        .hub
        .to_users(task.stakeholders(), ServerEvent::TaskUpdated(task.clone().into()));
}

/// POST /api/tasks - 创建任务 (创建者 = 当前用户)
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<TaskCreate>,
) -> AppResult<Json<Task>> {
    if payload.reminder_at > payload.scheduled_at {
        return Err(AppError::new(ErrorCode::ReminderAfterSchedule)
            .with_detail("reminder_at", payload.reminder_at)
            .with_detail("scheduled_at", payload.scheduled_at));
    }
    if let Some(assignee) = &payload.assigned_to
        && state.users.find_by_id(assignee).await?.is_none()
    {
        return Err(AppError::with_message(
            ErrorCode::UserNotFound,
            format!("Assignee {} not found", assignee),
        )
        .with_detail("field", "assigned_to"));
    }

    let task = state.tasks.create(&current_user.id, payload).await?;
    tracing::info!(
        task_id = %task.id_string(),
        created_by = %current_user.id,
        reminder_at = task.reminder_at,
        "Task created"
    );
    Ok(Json(task.into()))
}

/// GET /api/tasks - 当前用户创建或被指派的任务
pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Task>>> {
    let tasks = state.tasks.find_for_user(&current_user.id).await?;
    Ok(Json(convert_all(tasks)))
}

/// GET /api/tasks/{id} - 获取单个任务
///
/// 创建者、指派人可见；志愿者可查看尚未被接受的任务
pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Task>> {
    let task = load_task(&state, &id).await?;

    let is_stakeholder = task.stakeholders().contains(&current_user.id);
    let open_for_volunteer =
        current_user.has_role(UserRole::Volunteer) && task.assigned_to.is_none();
    if !is_stakeholder && !open_for_volunteer {
        return Err(AppError::permission_denied("Not allowed to view this task"));
    }

    Ok(Json(task.into()))
}

/// PATCH /api/tasks/{id}/status - 更新状态 (创建者或指派人)
pub async fn update_status(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<TaskStatusUpdate>,
) -> AppResult<Json<Task>> {
    let task = load_task(&state, &id).await?;
    if !task.stakeholders().contains(&current_user.id) {
        return Err(AppError::permission_denied(
            "Only the creator or assignee can change the status",
        ));
    }

    let updated = state.tasks.update_status(&id, payload.status).await?;
    tracing::info!(
        task_id = %updated.id_string(),
        status = payload.status.as_str(),
        by = %current_user.id,
        "Task status updated"
    );

    publish_task_updated(&state, &updated);
    Ok(Json(updated.into()))
}

/// DELETE /api/tasks/{id} - 删除任务 (仅创建者)
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let task = load_task(&state, &id).await?;
    if task.created_by != current_user.id {
        return Err(AppError::permission_denied(
            "Only the creator can delete a task",
        ));
    }

    let deleted = state.tasks.delete(&id).await?;
    if deleted {
        tracing::info!(task_id = %task.id_string(), by = %current_user.id, "Task deleted");
    }
    Ok(Json(deleted))
}
