//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查 (公共)
//! - [`users`] - 注册、登录、当前用户
//! - [`tasks`] - 任务管理
//! - [`volunteer`] - 志愿者接单 (VOLUNTEER 角色)
//! - [`emergency`] - 紧急报警
//! - [`chat`] - 聊天室和消息
//! - [`prescriptions`] - 处方
//! - [`grocery`] - 代购订单
//! - [`forum`] - 社区论坛
//! - [`health_logs`] - 健康活动日志
//! - [`checkin`] - 报平安
//! - [`ratings`] - 用户评分
//! - [`voice`] - 语音指令历史
//! - [`live`] - 实时事件 WebSocket

pub mod convert;

pub mod chat;
pub mod checkin;
pub mod emergency;
pub mod forum;
pub mod grocery;
pub mod health;
pub mod health_logs;
pub mod live;
pub mod prescriptions;
pub mod ratings;
pub mod tasks;
pub mod users;
pub mod voice;
pub mod volunteer;

use axum::Router;
use axum::body::Body;
use axum::middleware::{self, Next};
use http::{Request, Response};
use std::time::Instant;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestUuid, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::core::ServerState;

/// 访问日志 (target = "http_access")，带上 x-request-id
async fn access_log(request: Request<Body>, next: Next) -> Response<Body> {
    let started = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .unwrap_or("-")
        .to_owned();

    let response = next.run(request).await;

    tracing::info!(
        target: "http_access",
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        request_id = %request_id,
        "request completed"
    );
    response
}

/// 所有业务路由，不含中间件
pub fn build_router() -> Router<ServerState> {
    [
        users::router(),
        tasks::router(),
        volunteer::router(),
        emergency::router(),
        chat::router(),
        prescriptions::router(),
        grocery::router(),
        forum::router(),
        health_logs::router(),
        checkin::router(),
        ratings::router(),
        voice::router(),
        live::router(),
    ]
    .into_iter()
    .fold(health::router(), |app, routes| app.merge(routes))
}

/// 路由 + 中间件栈; `main` 与集成测试共用
///
/// 由外到内: request-id → trace → 访问日志 → gzip → CORS → JWT
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router()
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(access_log))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
