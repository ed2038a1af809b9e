/// 命令模块
///
/// 每个命令接收显式的 [`AppState`](crate::AppState) 与请求结构体，返回统一的响应结构；
/// 修改台账的命令在成功后立即整体写回。

use serde::Serialize;
use std::path::PathBuf;

pub mod dashboard;
pub mod device_management;
pub mod maintenance;
pub mod reports;
pub mod settings;

pub use dashboard::show_dashboard;
pub use device_management::{add_device, delete_device, edit_device, search_devices};
pub use maintenance::{log_maintenance, maintenance_schedule, maintenance_statistics};
pub use reports::{center_report, comprehensive_report, custom_report};
pub use settings::{create_backup, interval_settings, notification_settings, restore_backup};

/// 命令响应
#[derive(Debug, Serialize)]
pub struct CommandResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T> CommandResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

/// 带可选导出文件的列表结果
#[derive(Debug, Serialize)]
pub struct ListWithExport<T> {
    pub rows: Vec<T>,
    /// 导出的 xlsx 文件（未要求导出时为空）
    pub exported: Option<PathBuf>,
}
