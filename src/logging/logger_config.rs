//! 日志配置模块
//!
//! 把应用配置中的 [`LoggingConfig`] 转换为日志器可用的输出目标与级别

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::utils::config::LoggingConfig;

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// 日志级别
    pub level: LogLevel,
    /// 日志输出目标
    pub targets: Vec<LogTarget>,
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(format!("Invalid LogLevel: {}", s)),
        }
    }
}

/// 日志输出目标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LogTarget {
    /// 标准错误输出（标准输出留给命令结果）
    Console,
    File { path: PathBuf },
}

/// 核心问题日志分类
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum CoreLogCategory {
    /// 导入台账、恢复备份时的解析失败
    FileParsingFailure,
    /// 保存台账、导出报告失败
    PersistenceFailure,
    /// 新增、编辑、删除、登记维护等用户操作
    UserOperations,
    /// 配置读取与校验警告
    ConfigWarning,
}

impl std::fmt::Display for CoreLogCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let category_name = match self {
            CoreLogCategory::FileParsingFailure => "文件解析失败",
            CoreLogCategory::PersistenceFailure => "数据保存失败",
            CoreLogCategory::UserOperations => "用户操作",
            CoreLogCategory::ConfigWarning => "配置警告",
        };
        write!(f, "{}", category_name)
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            targets: vec![LogTarget::Console],
        }
    }
}

impl LoggerConfig {
    /// 由应用配置生成；无法识别的级别按 info 处理
    pub fn from_logging_config(config: &LoggingConfig) -> Self {
        let level = config.log_level.parse().unwrap_or(LogLevel::Info);
        let mut targets = Vec::new();
        if config.console_output {
            targets.push(LogTarget::Console);
        }
        if config.file_output {
            if let Some(path) = &config.log_file_path {
                targets.push(LogTarget::File { path: path.clone() });
            }
        }
        Self { level, targets }
    }

    /// 是否需要写文件
    pub fn has_file_target(&self) -> bool {
        self.targets.iter().any(|t| matches!(t, LogTarget::File { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_logging_config() {
        let mut logging = LoggingConfig::default();
        let config = LoggerConfig::from_logging_config(&logging);
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.targets, vec![LogTarget::Console]);
        assert!(!config.has_file_target());

        logging.log_level = "DEBUG".to_string();
        logging.console_output = false;
        logging.file_output = true;
        let config = LoggerConfig::from_logging_config(&logging);
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(
            config.targets,
            vec![LogTarget::File { path: PathBuf::from("logs/maintenance.log") }]
        );
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        let logging = LoggingConfig {
            log_level: "verbose".to_string(),
            ..Default::default()
        };
        assert_eq!(LoggerConfig::from_logging_config(&logging).level, LogLevel::Info);
        assert_eq!(LevelFilter::from(LogLevel::Warn), LevelFilter::Warn);
        assert_eq!(CoreLogCategory::PersistenceFailure.to_string(), "数据保存失败");
    }
}
