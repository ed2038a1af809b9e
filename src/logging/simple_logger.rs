/// 简化版Logger实现
/// 控制台输出走标准错误，文件输出为追加模式

use super::*;
use crate::utils::config::LoggingConfig;
use log::{Log, Metadata, Record};
use std::sync::{Arc, Mutex};
use std::fs::OpenOptions;
use std::io::{Write as IoWrite, BufWriter};
use chrono::Local;

/// 简化版Logger - 实现log::Log trait
pub struct SimpleLogger {
    config: LoggerConfig,
    file_writer: Arc<Mutex<Option<BufWriter<std::fs::File>>>>,
}

impl SimpleLogger {
    pub fn new(config: LoggerConfig) -> Self {
        Self {
            config,
            file_writer: Arc::new(Mutex::new(None)),
        }
    }

    /// 打开日志文件（若配置了文件目标）
    fn open_file_target(&self) -> Result<(), Box<dyn std::error::Error>> {
        for target in &self.config.targets {
            if let LogTarget::File { path } = target {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }

                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)?;

                let mut writer_guard = self.file_writer.lock().map_err(|_| "文件写入器锁定失败")?;
                *writer_guard = Some(BufWriter::new(file));
                break; // 只处理第一个文件目标
            }
        }
        Ok(())
    }

    pub fn init(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.open_file_target()?;

        // 设置为全局logger
        let logger = SimpleLogger {
            config: self.config.clone(),
            file_writer: self.file_writer.clone(),
        };

        log::set_boxed_logger(Box::new(logger))?;
        log::set_max_level(self.config.level.into());

        Ok(())
    }

    fn format_line(record: &Record) -> String {
        format!(
            "[{}] [{}] [{}] - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    }

    fn write_to_console(&self, record: &Record) {
        let message = format!(
            "[{}] [{}] {}",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.args()
        );

        match record.level() {
            log::Level::Error => eprintln!("\x1b[31m{}\x1b[0m", message),
            log::Level::Warn => eprintln!("\x1b[33m{}\x1b[0m", message),
            _ => eprintln!("{}", message),
        }
        let _ = std::io::stderr().flush();
    }

    fn write_to_file(&self, record: &Record) {
        if let Ok(mut writer_guard) = self.file_writer.lock() {
            if let Some(writer) = writer_guard.as_mut() {
                let message = format!("{}\n", Self::format_line(record));
                if let Err(e) = writer.write_all(message.as_bytes()) {
                    eprintln!("写入日志文件失败: {}", e);
                } else {
                    let _ = writer.flush();
                }
            }
        }
    }
}

impl Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::LevelFilter::from(self.config.level)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        for target in &self.config.targets {
            match target {
                LogTarget::Console => self.write_to_console(record),
                LogTarget::File { .. } => self.write_to_file(record),
            }
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();

        if let Ok(mut writer_guard) = self.file_writer.lock() {
            if let Some(writer) = writer_guard.as_mut() {
                let _ = writer.flush();
            }
        }
    }
}

/// 按应用日志配置初始化全局日志器
///
/// 未启用文件输出时交给 env_logger（仍可用 `RUST_LOG` 覆盖级别）；
/// 重复初始化不视为错误。
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let logger_config = LoggerConfig::from_logging_config(config);

    if !logger_config.has_file_target() {
        if logger_config.targets.is_empty() {
            log::set_max_level(log::LevelFilter::Off);
            return Ok(());
        }
        let _ = env_logger::Builder::new()
            .filter_level(logger_config.level.into())
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .try_init();
        return Ok(());
    }

    let logger = SimpleLogger::new(logger_config);
    match logger.init() {
        Ok(()) => Ok(()),
        Err(e) if e.is::<log::SetLoggerError>() => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;
    use tempfile::TempDir;

    #[test]
    fn test_file_target_appends_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logs").join("maintenance.log");
        let logger = SimpleLogger::new(LoggerConfig {
            level: LogLevel::Info,
            targets: vec![LogTarget::File { path: path.clone() }],
        });
        logger.open_file_target().unwrap();

        logger.log(
            &Record::builder()
                .args(format_args!("设备已删除: KHL-PHC-001"))
                .level(Level::Info)
                .target("maintenance")
                .build(),
        );
        logger.log(
            &Record::builder()
                .args(format_args!("调试信息"))
                .level(Level::Debug)
                .target("maintenance")
                .build(),
        );
        logger.flush();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.contains("[INFO] [maintenance] - 设备已删除: KHL-PHC-001"));
    }
}
