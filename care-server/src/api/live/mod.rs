//! Live WebSocket 模块
//!
//! GET /api/live/ws?token=<JWT>
//!
//! 浏览器 WebSocket 不支持自定义 header，令牌通过 query 传递并在升级前校验

mod handler;

pub use handler::handle_command;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/live/ws", get(handler::live_ws))
}
