//! Logging Infrastructure
//!
//! stdout 输出始终开启；设置 `LOG_DIR` 后额外按天滚动写入文件。

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// `RUST_LOG` 未设置时使用的过滤规则
///
/// `http_access` 和 `security` 是独立的 target，需要单独放行
pub fn default_filter(level: &str) -> String {
    format!("care_server={level},tower_http={level},http_access={level},security={level}")
}

/// Initialize the global subscriber
///
/// 返回的 guard 必须在 main 中持有到进程退出，否则文件日志会丢失尾部。
pub fn init_logger(log_level: &str, log_dir: Option<&Path>) -> std::io::Result<Option<WorkerGuard>> {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(log_level)))
    };

    let stdout_layer = fmt::layer()
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_filter(filter());

    let Some(dir) = log_dir else {
        tracing_subscriber::registry().with(stdout_layer).init();
        return Ok(None);
    };

    std::fs::create_dir_all(dir)?;
    let file_appender = tracing_appender::rolling::daily(dir, "care-server.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(filter());

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .init();

    Ok(Some(guard))
}
