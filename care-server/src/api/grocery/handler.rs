//! Grocery API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{GroceryOrder, GroceryOrderCreate, GroceryStatusUpdate};
use shared::{AppError, AppResult, ErrorCode, ServerEvent};

use crate::api::convert::convert_all;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models as db;

/// 向下单人和接单志愿者推送 groceryUpdated
pub(crate) fn publish_grocery_updated(state: &ServerState, order: &db::GroceryOrder) {
    state.hub.to_users(
        order.stakeholders(),
        ServerEvent::GroceryUpdated(order.clone().into()),
    );
}

/// POST /api/grocery - 下单
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<GroceryOrderCreate>,
) -> AppResult<Json<GroceryOrder>> {
    let order = state.grocery.create(&current_user.id, payload).await?;
    tracing::info!(order_id = %order.id_string(), user = %current_user.id, "Grocery order created");
    Ok(Json(order.into()))
}

/// GET /api/grocery/myorders - 自己下的或自己接的订单
pub async fn my_orders(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<GroceryOrder>>> {
    let orders = state.grocery.find_for_user(&current_user.id).await?;
    Ok(Json(convert_all(orders)))
}

/// PATCH /api/grocery/{id}/status - 下单人或接单人修改状态
pub async fn update_status(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<GroceryStatusUpdate>,
) -> AppResult<Json<GroceryOrder>> {
    let order = state.grocery.find_by_id(&id).await?.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::GroceryOrderNotFound,
            format!("Grocery order {} not found", id),
        )
    })?;
    if !order.stakeholders().contains(&current_user.id) {
        return Err(AppError::permission_denied(format!(
            "Not allowed to update grocery order {}",
            id
        )));
    }

    let order = state.grocery.update_status(&id, payload.status).await?;
    tracing::info!(
        order_id = %order.id_string(),
        status = payload.status.as_str(),
        by = %current_user.id,
        "Grocery order status updated"
    );

    publish_grocery_updated(&state, &order);
    Ok(Json(order.into()))
}
