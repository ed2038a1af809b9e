use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::utils::error::{AppError, AppResult};

/// 环境变量前缀，例如 `MEDMAINT_PERSISTENCE_CONFIG__DATA_FILE`
pub const ENV_PREFIX: &str = "MEDMAINT";

/// 应用程序主配置结构
/// 包含应用程序运行所需的所有配置信息
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 应用程序基本设置
    pub app_settings: AppSettings,
    /// 维护排程配置
    pub maintenance_config: MaintenanceConfig,
    /// 通知偏好（仅保存，不发送）
    pub notification_config: NotificationConfig,
    /// 日志配置
    pub logging_config: LoggingConfig,
    /// 数据存储配置
    pub persistence_config: PersistenceConfig,
}

/// 应用程序基本设置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// 应用程序名称
    pub app_name: String,
    /// 应用程序版本
    pub app_version: String,
    /// 运行环境 (development, testing, production)
    pub environment: String,
}

/// 维护排程配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceConfig {
    /// 新增设备的默认维护周期（天）
    pub default_interval_days: u32,
    /// 用户录入维护周期的下限（天）
    pub min_interval_days: u32,
    /// 用户录入维护周期的上限（天）
    pub max_interval_days: u32,
}

/// 通知偏好
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// 提前多少天提醒 (1..=30)
    pub notify_days_before: u32,
    /// 是否提醒已逾期的维护
    pub notify_overdue: bool,
    /// 通知邮箱
    pub notify_email: Option<String>,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (debug, info, warn, error)
    pub log_level: String,
    /// 日志文件路径
    pub log_file_path: Option<PathBuf>,
    /// 是否启用控制台输出
    pub console_output: bool,
    /// 是否启用文件输出
    pub file_output: bool,
}

/// 数据持久化配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// 设备台账文件路径
    pub data_file: PathBuf,
    /// 备份目录
    pub backup_dir: PathBuf,
    /// 报告导出目录
    pub export_dir: PathBuf,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            app_name: "MedicalMaintenance".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "production".to_string(),
        }
    }
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            default_interval_days: 90,
            min_interval_days: 7,
            max_interval_days: 365,
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            notify_days_before: 7,
            notify_overdue: true,
            notify_email: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_file_path: Some(PathBuf::from("logs/maintenance.log")),
            console_output: true,
            file_output: false,
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data/All_Devices_Merged.xlsx"),
            backup_dir: PathBuf::from("backups"),
            export_dir: PathBuf::from("reports"),
        }
    }
}

impl MaintenanceConfig {
    /// 校验用户录入的维护周期是否在允许范围内
    pub fn check_interval(&self, interval_days: u32) -> AppResult<u32> {
        if interval_days < self.min_interval_days || interval_days > self.max_interval_days {
            return Err(AppError::validation_error(format!(
                "维护周期 {} 天超出范围，允许范围: {}..={} 天",
                interval_days, self.min_interval_days, self.max_interval_days
            )));
        }
        Ok(interval_days)
    }
}

/// 配置管理器
/// 负责加载、保存和管理应用程序配置
pub struct ConfigManager {
    config: AppConfig,
    config_file_path: PathBuf,
}

impl ConfigManager {
    /// 创建新的配置管理器
    pub fn new(config_file_path: PathBuf) -> Self {
        Self {
            config: AppConfig::default(),
            config_file_path,
        }
    }

    /// 从文件与环境变量加载配置
    ///
    /// 配置文件不存在时使用默认值（不会自动创建文件）
    pub fn load(&mut self) -> AppResult<()> {
        let settings = config::Config::builder()
            .add_source(
                config::File::from(self.config_file_path.as_path())
                    .format(config::FileFormat::Json)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        self.config = settings.try_deserialize::<AppConfig>()?;
        log::debug!("配置已加载: {}", self.config_file_path.display());
        Ok(())
    }

    /// 将配置保存到文件
    pub fn save_to_file(&self) -> AppResult<()> {
        if let Some(parent) = self.config_file_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| AppError::io_error(format!("创建配置目录失败: {}", e), format!("{:?}", e.kind())))?;
            }
        }

        let content = serde_json::to_string_pretty(&self.config)
            .map_err(|e| AppError::json_error(format!("序列化配置失败: {}", e)))?;

        std::fs::write(&self.config_file_path, content)
            .map_err(|e| AppError::io_error(format!("写入配置文件失败: {}", e), format!("{:?}", e.kind())))?;

        log::info!("配置已保存到 {}", self.config_file_path.display());
        Ok(())
    }

    /// 获取配置的只读引用
    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    /// 获取配置的可变引用
    pub fn get_config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    /// 配置文件路径
    pub fn config_file_path(&self) -> &Path {
        &self.config_file_path
    }

    /// 验证配置的有效性
    pub fn validate_config(&self) -> AppResult<()> {
        validate(&self.config)
    }
}

/// 验证配置的有效性
pub fn validate(config: &AppConfig) -> AppResult<()> {
    let maintenance = &config.maintenance_config;
    if maintenance.min_interval_days == 0 {
        return Err(AppError::configuration_error("维护周期下限必须大于0"));
    }
    if maintenance.min_interval_days > maintenance.max_interval_days {
        return Err(AppError::configuration_error(format!(
            "维护周期下限 {} 大于上限 {}",
            maintenance.min_interval_days, maintenance.max_interval_days
        )));
    }
    if !(maintenance.min_interval_days..=maintenance.max_interval_days)
        .contains(&maintenance.default_interval_days)
    {
        return Err(AppError::configuration_error(format!(
            "默认维护周期 {} 不在 {}..={} 范围内",
            maintenance.default_interval_days, maintenance.min_interval_days, maintenance.max_interval_days
        )));
    }

    let notify_days = config.notification_config.notify_days_before;
    if !(1..=30).contains(&notify_days) {
        return Err(AppError::configuration_error(format!(
            "提前提醒天数 {} 无效，有效范围: 1..=30",
            notify_days
        )));
    }

    let valid_environments = ["development", "testing", "production"];
    if !valid_environments.contains(&config.app_settings.environment.as_str()) {
        return Err(AppError::configuration_error(format!(
            "无效的环境配置: {}，有效值: {:?}",
            config.app_settings.environment, valid_environments
        )));
    }

    let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_log_levels.contains(&config.logging_config.log_level.as_str()) {
        return Err(AppError::configuration_error(format!(
            "无效的日志级别: {}，有效值: {:?}",
            config.logging_config.log_level, valid_log_levels
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = ConfigManager::new(temp_dir.path().join("absent.json"));
        manager.load().unwrap();

        let config = manager.get_config();
        assert_eq!(config.maintenance_config.default_interval_days, 90);
        assert_eq!(config.notification_config.notify_days_before, 7);
        manager.validate_config().unwrap();
    }

    #[test]
    fn test_save_then_load_preserves_notification_settings() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config").join("app_config.json");

        let mut manager = ConfigManager::new(path.clone());
        manager.get_config_mut().notification_config.notify_days_before = 14;
        manager.get_config_mut().notification_config.notify_email = Some("biomed@example.org".to_string());
        manager.save_to_file().unwrap();

        let mut reloaded = ConfigManager::new(path);
        reloaded.load().unwrap();
        let notification = &reloaded.get_config().notification_config;
        assert_eq!(notification.notify_days_before, 14);
        assert_eq!(notification.notify_email.as_deref(), Some("biomed@example.org"));
        assert!(notification.notify_overdue);
    }

    #[test]
    fn test_partial_config_file_is_filled_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("partial.json");
        std::fs::write(&path, r#"{ "maintenance_config": { "default_interval_days": 30 } }"#).unwrap();

        let mut manager = ConfigManager::new(path);
        manager.load().unwrap();
        let maintenance = &manager.get_config().maintenance_config;
        assert_eq!(maintenance.default_interval_days, 30);
        assert_eq!(maintenance.max_interval_days, 365);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.notification_config.notify_days_before = 0;
        assert!(validate(&config).is_err());

        let mut config = AppConfig::default();
        config.maintenance_config.default_interval_days = 400;
        assert!(validate(&config).is_err());

        let mut config = AppConfig::default();
        config.logging_config.log_level = "verbose".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_check_interval_bounds() {
        let maintenance = MaintenanceConfig::default();
        assert_eq!(maintenance.check_interval(7).unwrap(), 7);
        assert_eq!(maintenance.check_interval(365).unwrap(), 365);
        assert!(maintenance.check_interval(6).is_err());
        assert!(maintenance.check_interval(366).is_err());
    }
}
