//! # 日志记录模块 (Logging Module)
//!
//! ## 业务说明
//! 记录设备台账的导入、保存、用户操作等运行信息，为问题排查和操作追溯提供依据
//!
//! ## 日志策略
//! - **文件解析**: 台账导入与备份恢复时的缺列、坏日期、无编号行
//! - **数据保存**: 台账写回、报告导出、备份失败
//! - **用户操作**: 新增、编辑、删除设备，登记维护，批量修改周期
//! - **配置警告**: 配置文件缺失或取值越界
//!
//! 控制台日志写到标准错误，标准输出只留给命令结果（包括 `--json` 输出）。

pub mod logger_config;
pub mod simple_logger;

pub use logger_config::*;
pub use simple_logger::{init_logging, SimpleLogger};

/// 记录文件解析失败日志
#[macro_export]
macro_rules! log_file_parsing_failure {
    ($msg:expr) => {
        log::warn!("[{}] {}", $crate::logging::CoreLogCategory::FileParsingFailure, $msg);
    };
    ($msg:expr, $($arg:tt)*) => {
        log::warn!("[{}] {}", $crate::logging::CoreLogCategory::FileParsingFailure, format!($msg, $($arg)*));
    };
}

/// 记录数据保存失败日志
#[macro_export]
macro_rules! log_persistence_failure {
    ($msg:expr) => {
        log::error!("[{}] {}", $crate::logging::CoreLogCategory::PersistenceFailure, $msg);
    };
    ($msg:expr, $($arg:tt)*) => {
        log::error!("[{}] {}", $crate::logging::CoreLogCategory::PersistenceFailure, format!($msg, $($arg)*));
    };
}

/// 记录用户操作日志
#[macro_export]
macro_rules! log_user_operation {
    ($msg:expr) => {
        log::info!("[{}] {}", $crate::logging::CoreLogCategory::UserOperations, $msg);
    };
    ($msg:expr, $($arg:tt)*) => {
        log::info!("[{}] {}", $crate::logging::CoreLogCategory::UserOperations, format!($msg, $($arg)*));
    };
}

/// 记录用户配置操作警告
#[macro_export]
macro_rules! log_config_warning {
    ($msg:expr) => {
        log::warn!("[{}] {}", $crate::logging::CoreLogCategory::ConfigWarning, $msg);
    };
    ($msg:expr, $($arg:tt)*) => {
        log::warn!("[{}] {}", $crate::logging::CoreLogCategory::ConfigWarning, format!($msg, $($arg)*));
    };
}

// 重新导出宏
pub use crate::log_file_parsing_failure;
pub use crate::log_persistence_failure;
pub use crate::log_user_operation;
pub use crate::log_config_warning;
