use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::auth::JwtConfig;

/// 配置加载错误
///
/// 缺少必填项或取值非法时启动直接失败，不使用任何回退密钥或地址
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// SMTP 出站配置
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// 仅当用户名和密码都设置时才启用认证
    pub username: Option<String>,
    pub password: Option<String>,
    /// false = 明文连接 (本地开发 relay)
    pub tls: bool,
    /// 发件人邮箱
    pub from: String,
}

impl SmtpConfig {
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(u), Some(p)) => Some((u.as_str(), p.as_str())),
            _ => None,
        }
    }
}

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 5000 | HTTP 服务端口 |
/// | DATABASE_PATH | ./data/carelink.db | RocksDB 数据目录 |
/// | ENVIRONMENT | development | 运行环境 |
/// | JWT_SECRET | (必填, ≥ 32 字符) | JWT 签名密钥 |
/// | JWT_EXPIRATION_MINUTES | 60 | 令牌有效期 |
/// | JWT_ISSUER / JWT_AUDIENCE | carelink / carelink-clients | |
/// | SMTP_HOST | (必填) | 邮件 relay |
/// | SMTP_PORT | 587 | |
/// | SMTP_USERNAME / SMTP_PASSWORD | 无 | |
/// | SMTP_TLS | true | |
/// | MAIL_FROM | (必填) | 发件人 |
/// | REMINDER_SCAN_INTERVAL_SECS | 60 | 提醒扫描间隔 (≥ 1) |
/// | LIVE_CHANNEL_CAPACITY | 256 | 实时事件通道容量 |
/// | LOG_LEVEL | info | |
/// | LOG_DIR | 无 | 设置后按天滚动写入日志文件 |
#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub database_path: PathBuf,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub jwt: JwtConfig,
    pub smtp: SmtpConfig,
    pub reminder_scan_interval: Duration,
    pub live_channel_capacity: usize,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// 从进程环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意 key → value 查找函数加载配置
    ///
    /// 空字符串视为未设置
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.len() < 32 {
            return Err(ConfigError::Invalid {
                name: "JWT_SECRET",
                reason: "must be at least 32 characters long".into(),
            });
        }

        let mail_from = get("MAIL_FROM").ok_or(ConfigError::Missing("MAIL_FROM"))?;
        if mail_from.parse::<lettre::message::Mailbox>().is_err() {
            return Err(ConfigError::Invalid {
                name: "MAIL_FROM",
                reason: format!("'{}' is not a valid mailbox", mail_from),
            });
        }

        let scan_secs: u64 = parse_or(&get, "REMINDER_SCAN_INTERVAL_SECS", 60)?;
        if scan_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "REMINDER_SCAN_INTERVAL_SECS",
                reason: "must be at least 1".into(),
            });
        }

        let live_channel_capacity: usize = parse_or(&get, "LIVE_CHANNEL_CAPACITY", 256)?;
        if live_channel_capacity == 0 {
            return Err(ConfigError::Invalid {
                name: "LIVE_CHANNEL_CAPACITY",
                reason: "must be at least 1".into(),
            });
        }

        Ok(Self {
            http_port: parse_or(&get, "HTTP_PORT", 5000)?,
            database_path: get("DATABASE_PATH")
                .unwrap_or_else(|| "./data/carelink.db".into())
                .into(),
            environment: get("ENVIRONMENT").unwrap_or_else(|| "development".into()),
            jwt: JwtConfig {
                secret: jwt_secret,
                expiration_minutes: parse_or(&get, "JWT_EXPIRATION_MINUTES", 60)?,
                issuer: get("JWT_ISSUER").unwrap_or_else(|| "carelink".into()),
                audience: get("JWT_AUDIENCE").unwrap_or_else(|| "carelink-clients".into()),
            },
            smtp: SmtpConfig {
                host: get("SMTP_HOST").ok_or(ConfigError::Missing("SMTP_HOST"))?,
                port: parse_or(&get, "SMTP_PORT", 587)?,
                username: get("SMTP_USERNAME"),
                password: get("SMTP_PASSWORD"),
                tls: parse_or(&get, "SMTP_TLS", true)?,
                from: mail_from,
            },
            reminder_scan_interval: Duration::from_secs(scan_secs),
            live_channel_capacity,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: get("LOG_DIR").map(PathBuf::from),
        })
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_or<T, G>(get: &G, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: format!("'{}': {}", raw, e),
        }),
    }
}
