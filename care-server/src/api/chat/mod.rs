//! Chat API 模块
//!
//! 消息只对聊天室参与者可见；新消息推送给已加入该房间的实时连接

mod handler;

pub(crate) use handler::{load_room_for, post_message};

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/chat", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/rooms", get(handler::list_rooms).post(handler::create_room))
        .route("/rooms/{id}", get(handler::room_messages))
        .route("/message", post(handler::send_message))
}
