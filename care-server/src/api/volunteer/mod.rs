//! Volunteer API 模块
//!
//! 所有路由要求 VOLUNTEER 角色

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch},
};
use shared::models::UserRole;

use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/volunteer", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/unassigned", get(handler::unassigned))
        .route("/accept/task/{id}", patch(handler::accept))
        .route("/accept/grocery/{id}", patch(handler::accept_grocery))
        .layer(middleware::from_fn_with_state(UserRole::Volunteer, require_role))
}
