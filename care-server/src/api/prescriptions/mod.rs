//! Prescription API 模块
//!
//! 患者本人或 FAMILY 角色可读写

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/prescriptions", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/{user_id}", get(handler::list_for_user))
}
