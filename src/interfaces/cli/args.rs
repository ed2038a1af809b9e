//! 命令行参数定义

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::device_filter::DeviceFilter;
use crate::models::{DeviceStatus, MaintenanceType, Priority, ScheduleWindow};
use crate::utils::time_utils::parse_date;

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).ok_or_else(|| format!("无法解析日期 '{}'，请使用 YYYY-MM-DD", value))
}

/// 医疗设备台账与预防性维护排程
#[derive(Parser, Debug)]
#[command(name = "maintenance", version, about = "医疗设备台账与预防性维护排程")]
pub struct Cli {
    /// 台账文件（默认取配置中的 persistence_config.data_file）
    #[arg(long, global = true, env = "MEDMAINT_DATA")]
    pub data: Option<PathBuf>,

    /// 配置文件（JSON，不存在时使用默认配置）
    #[arg(long, global = true, env = "MEDMAINT_CONFIG", default_value = "config/maintenance.json")]
    pub config: PathBuf,

    /// 以 JSON 输出结果
    #[arg(long, global = true)]
    pub json: bool,

    /// 以指定日期零点作为当前时刻
    #[arg(long, global = true, value_parser = parse_date_arg)]
    pub today: Option<NaiveDate>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 仪表盘：关键指标、各中心设备数、维护状态分布、需立即维护的设备
    Dashboard {
        #[command(flatten)]
        filter: FilterArgs,
        /// 包含所有设备状态（默认只看正常工作的设备）
        #[arg(long)]
        all_statuses: bool,
    },

    /// 设备管理
    Devices {
        #[command(subcommand)]
        action: DeviceAction,
    },

    /// 维护计划与登记
    Maintenance {
        #[command(subcommand)]
        action: MaintenanceAction,
    },

    /// 报告
    Reports {
        #[command(subcommand)]
        action: ReportAction,
    },

    /// 设置
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

/// 通用筛选参数
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// 中心名称或代码（可重复）
    #[arg(long = "center")]
    pub centers: Vec<String>,
    /// 科室（可重复）
    #[arg(long = "department")]
    pub departments: Vec<String>,
    /// 设备状态（可重复，阿拉伯语标签或 working/broken/under-maintenance）
    #[arg(long = "status")]
    pub statuses: Vec<DeviceStatus>,
    /// 优先级（可重复）
    #[arg(long = "priority")]
    pub priorities: Vec<Priority>,
}

impl FilterArgs {
    pub fn into_filter(self) -> DeviceFilter {
        DeviceFilter {
            centers: self.centers,
            departments: self.departments,
            statuses: self.statuses,
            priorities: self.priorities,
            search_term: None,
        }
    }
}

/// 导出参数
#[derive(Args, Debug, Clone, Default)]
pub struct ExportArgs {
    /// 导出为 xlsx
    #[arg(long)]
    pub export: bool,
    /// 导出目录（默认取配置中的 persistence_config.export_dir）
    #[arg(long, requires = "export")]
    pub out_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum DeviceAction {
    /// 按名称、序列号、型号搜索
    Search {
        /// 搜索词（不区分大小写）
        #[arg(default_value = "")]
        term: String,
        #[arg(long)]
        center: Option<String>,
        #[command(flatten)]
        export: ExportArgs,
    },

    /// 新增设备
    Add {
        /// 中心名称或代码
        #[arg(long)]
        center: String,
        /// 设备名称
        #[arg(long)]
        name: String,
        /// 科室
        #[arg(long)]
        department: String,
        #[arg(long, default_value = "")]
        manufacturer: String,
        #[arg(long, default_value = "")]
        model: String,
        #[arg(long, default_value = "")]
        serial: String,
        /// 安装日期
        #[arg(long, value_parser = parse_date_arg)]
        installed: Option<NaiveDate>,
        #[arg(long)]
        status: Option<DeviceStatus>,
        /// 维护周期（天）
        #[arg(long)]
        interval: Option<u32>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// 编辑设备（只修改给出的字段）
    Edit {
        asset_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        manufacturer: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        serial: Option<String>,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        status: Option<DeviceStatus>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        interval: Option<u32>,
        /// 整体替换维护日志
        #[arg(long)]
        notes: Option<String>,
    },

    /// 删除设备
    Delete {
        asset_id: String,
        /// 确认删除
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum MaintenanceAction {
    /// 维护计划
    Schedule {
        /// 时间窗: overdue / week / month / quarter / all
        #[arg(long, default_value = "overdue")]
        window: ScheduleWindow,
        /// 优先级（可重复，默认高与中）
        #[arg(long = "priority")]
        priorities: Vec<Priority>,
        /// 不按优先级过滤
        #[arg(long, conflicts_with = "priorities")]
        all_priorities: bool,
        #[arg(long)]
        center: Option<String>,
        #[command(flatten)]
        export: ExportArgs,
    },

    /// 登记一次已完成的维护
    Log {
        asset_id: String,
        /// 维护日期（默认今天）
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
        /// 维护类型: periodic / emergency / calibration / repair / parts-replacement
        #[arg(long = "type", default_value = "periodic")]
        maintenance_type: MaintenanceType,
        /// 技术员
        #[arg(long)]
        technician: String,
        #[arg(long, default_value = "")]
        notes: String,
        /// 更换的零件
        #[arg(long, default_value = "")]
        parts: String,
        /// 维护后的设备状态
        #[arg(long, default_value = "working")]
        status_after: DeviceStatus,
        /// 下次维护间隔（天，默认沿用当前周期）
        #[arg(long)]
        interval: Option<u32>,
    },

    /// 维护统计
    Stats,
}

#[derive(Subcommand, Debug)]
pub enum ReportAction {
    /// 综合报告
    Comprehensive {
        #[command(flatten)]
        export: ExportArgs,
    },
    /// 单个中心的报告
    Center {
        /// 中心名称或代码
        center: String,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// 自定义报告
    Custom {
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        export: ExportArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// 查看或批量修改某类设备的维护周期
    Interval {
        /// 设备名称
        equipment_name: String,
        /// 新的维护周期（天）；省略时只显示当前周期
        #[arg(long)]
        days: Option<u32>,
    },
    /// 查看或修改通知偏好
    Notifications {
        /// 提前提醒天数 (1..=30)
        #[arg(long)]
        days_before: Option<u32>,
        /// 是否提醒逾期维护
        #[arg(long)]
        overdue: Option<bool>,
        /// 通知邮箱（传空字符串清除）
        #[arg(long)]
        email: Option<String>,
    },
    /// 创建备份
    Backup {
        /// 备份目录（默认取配置中的 persistence_config.backup_dir）
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// 从备份恢复台账
    Restore {
        /// 备份文件
        file: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_schedule_arguments() {
        let cli = Cli::try_parse_from([
            "maintenance", "--today", "2024-06-01", "maintenance", "schedule", "--window", "month",
            "--priority", "high", "--center", "المحلة", "--export",
        ])
        .unwrap();
        assert_eq!(cli.today, NaiveDate::from_ymd_opt(2024, 6, 1));
        match cli.command {
            Commands::Maintenance { action: MaintenanceAction::Schedule { window, priorities, center, export, .. } } => {
                assert_eq!(window, ScheduleWindow::Month);
                assert_eq!(priorities, vec![Priority::High]);
                assert_eq!(center.as_deref(), Some("المحلة"));
                assert!(export.export);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_arabic_labels_and_bad_date() {
        let cli = Cli::try_parse_from(["maintenance", "dashboard", "--status", "معطل"]).unwrap();
        match cli.command {
            Commands::Dashboard { filter, .. } => assert_eq!(filter.statuses, vec![DeviceStatus::Broken]),
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(Cli::try_parse_from(["maintenance", "--today", "yesterday", "dashboard"]).is_err());
    }
}
