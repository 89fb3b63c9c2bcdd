//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /health | GET | 健康检查 | 无 |

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

/// 健康检查路由 - 公共路由 (无需认证)
pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Serialize)]
pub struct HealthResponse {
    /// healthy | degraded
    status: &'static str,
    version: &'static str,
    /// 数据库连通性
    database: &'static str,
    /// 当前在线用户数
    online_users: usize,
    /// WebSocket 连接数 (同一用户可多连)
    connections: usize,
}

pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let database = match state.get_db().health().await {
        Ok(()) => "ok",
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            "error"
        }
    };

    Json(HealthResponse {
        status: if database == "ok" { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database,
        online_users: state.hub.online_users(),
        connections: state.hub.subscriber_count(),
    })
}
