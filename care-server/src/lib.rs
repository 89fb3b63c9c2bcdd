//! CareLink Server - 老人照护协作平台后端
//!
//! # 架构概述
//!
//! - **数据库** (`db`): 嵌入式 SurrealDB (RocksDB) 存储用户、任务、报警和聊天
//! - **认证** (`auth`): JWT + Argon2
//! - **提醒** (`scheduler` + `notify`): 定时扫描到期任务并发送提醒邮件
//! - **实时推送** (`live`): EventHub 按 audience 分发服务端事件
//! - **HTTP API** (`api`): RESTful 接口和 WebSocket
//!
//! # 模块结构
//!
//! ```text
//! care-server/src/
//! ├── core/          # 配置、状态、后台任务、服务器
//! ├── auth/          # JWT 认证、角色检查
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库模型和 repository
//! ├── live/          # 实时事件分发
//! ├── notify/        # 邮件传输和提醒邮件
//! ├── scheduler/     # 提醒扫描器
//! └── utils/         # 日志、输入校验
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod live;
pub mod notify;
pub mod scheduler;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use live::EventHub;
pub use shared::{AppError, AppResult, ErrorCode};

// Re-export logger functions
pub use utils::logger::init_logger;

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
   ______                __    _       __
  / ____/___ _________  / /   (_)___  / /__
 / /   / __ `/ ___/ _ \/ /   / / __ \/ //_/
/ /___/ /_/ / /  /  __/ /___/ / / / / ,<
\____/\__,_/_/   \___/_____/_/_/ /_/_/|_|
    "#
    );
}
