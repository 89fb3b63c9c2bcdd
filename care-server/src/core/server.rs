//! Server Implementation
//!
//! HTTP 服务器启动和管理

use crate::core::tasks::BackgroundTasks;
use crate::core::{Config, Result, ServerState};

/// HTTP Server
pub struct Server {
    config: Config,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// 运行直到 ctrl-c
    ///
    /// 关闭顺序: 触发 shutdown 令牌 → HTTP graceful shutdown → 等待后台任务退出
    pub async fn run(&self) -> Result<()> {
        let state = ServerState::initialize(&self.config).await?;

        let mut tasks = BackgroundTasks::with_token(state.shutdown_token());
        state.start_background_tasks(&mut tasks);
        tracing::info!(count = tasks.running(), "background tasks running");

        let app = crate::api::build_app(&state).with_state(state.clone());

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(
            "CareLink server listening on {} (env: {})",
            addr,
            self.config.environment
        );

        let shutdown = state.shutdown_token();
        let signal = async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => tracing::info!("Shutting down..."),
                _ = shutdown.cancelled() => {}
            }
            shutdown.cancel();
        };

        let served = axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .await;

        let early = tasks.reap_finished();
        if !early.is_empty() {
            tracing::warn!(count = early.len(), "background tasks exited while serving");
        }
        tasks.shutdown().await;

        served?;
        Ok(())
    }
}
