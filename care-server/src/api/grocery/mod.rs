//! Grocery API 模块
//!
//! 志愿者接单走 `/api/volunteer/accept/grocery/{id}`

mod handler;

pub(crate) use handler::publish_grocery_updated;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/grocery", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/myorders", get(handler::my_orders))
        .route("/{id}/status", patch(handler::update_status))
}
