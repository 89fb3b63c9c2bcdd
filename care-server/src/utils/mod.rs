//! 工具模块 - 日志和输入校验

pub mod logger;
pub mod validation;
