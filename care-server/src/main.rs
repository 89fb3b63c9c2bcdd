use anyhow::Context;
use care_server::{Config, Server, init_logger, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. .env (可选)
    let _ = dotenv::dotenv();

    // 2. 加载配置 (缺少必填项直接退出)
    let config = Config::from_env().context("Failed to load configuration")?;

    // 3. 日志 (guard 必须存活到进程结束)
    let _log_guard = init_logger(&config.log_level, config.log_dir.as_deref())
        .context("Failed to initialize logger")?;

    print_banner();
    tracing::info!("CareLink server starting (env: {})", config.environment);

    // 4. 启动 HTTP 服务器 (Server::run 会初始化状态并启动后台任务)
    let server = Server::new(config);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
