/// 设置命令：维护周期、通知偏好、备份与恢复

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::CommandResponse;
use crate::log_user_operation;
use crate::services::application::BackupService;
use crate::utils::config::{validate, NotificationConfig};
use crate::utils::error::AppResult;
use crate::AppState;

/// 维护周期设置请求
#[derive(Debug, Clone, Deserialize)]
pub struct IntervalRequest {
    pub equipment_name: String,
    /// 为空时只查询当前周期
    pub interval_days: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct IntervalInfo {
    pub equipment_name: String,
    /// 该类设备最常见的周期
    pub current_interval_days: u32,
    /// 本次修改的设备数
    pub updated: usize,
}

/// 通知偏好修改请求，未给出的字段保持不变
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationRequest {
    pub notify_days_before: Option<u32>,
    pub notify_overdue: Option<bool>,
    pub notify_email: Option<String>,
}

impl NotificationRequest {
    fn is_empty(&self) -> bool {
        self.notify_days_before.is_none() && self.notify_overdue.is_none() && self.notify_email.is_none()
    }
}

#[derive(Debug, Serialize)]
pub struct RestoreInfo {
    pub restored_from: PathBuf,
    pub device_count: usize,
    pub saved_to: PathBuf,
}

pub fn interval_settings(state: &mut AppState, request: IntervalRequest) -> AppResult<CommandResponse<IntervalInfo>> {
    let updated = match request.interval_days {
        Some(days) => {
            let count = state.inventory().bulk_update_interval(&request.equipment_name, days)?;
            state.persist()?;
            count
        }
        None => 0,
    };
    let current_interval_days = state.inventory().current_interval(&request.equipment_name);
    let message = if updated > 0 {
        format!("已将 {} 台 {} 的维护周期更新为 {} 天", updated, request.equipment_name, current_interval_days)
    } else {
        format!("{} 当前维护周期 {} 天", request.equipment_name, current_interval_days)
    };
    Ok(CommandResponse::ok(
        message,
        IntervalInfo {
            equipment_name: request.equipment_name,
            current_interval_days,
            updated,
        },
    ))
}

/// 查看或修改通知偏好；修改后写入配置文件（只保存，不发送通知）
pub fn notification_settings(state: &mut AppState, request: NotificationRequest) -> AppResult<CommandResponse<NotificationConfig>> {
    if request.is_empty() {
        let current = state.config().notification_config.clone();
        return Ok(CommandResponse::ok("当前通知设置", current));
    }

    let mut candidate = state.config().clone();
    if let Some(days) = request.notify_days_before {
        candidate.notification_config.notify_days_before = days;
    }
    if let Some(overdue) = request.notify_overdue {
        candidate.notification_config.notify_overdue = overdue;
    }
    if let Some(email) = request.notify_email {
        let email = email.trim().to_string();
        candidate.notification_config.notify_email = (!email.is_empty()).then_some(email);
    }
    validate(&candidate)?;

    let manager = state.config_manager_mut();
    *manager.get_config_mut() = candidate;
    manager.save_to_file()?;
    log_user_operation!("通知设置已保存到 {}", manager.config_file_path().display());

    Ok(CommandResponse::ok(
        "通知设置已保存",
        state.config().notification_config.clone(),
    ))
}

pub fn create_backup(state: &AppState, backup_dir: Option<PathBuf>) -> AppResult<CommandResponse<PathBuf>> {
    let dir = backup_dir.unwrap_or_else(|| state.config().persistence_config.backup_dir.clone());
    let path = BackupService::create_backup(&state.dataset, &dir, state.now())?;
    Ok(CommandResponse::ok(format!("备份已创建: {}", path.display()), path))
}

/// 从备份恢复：先完整解析备份，成功后才替换台账并写回
pub fn restore_backup(state: &mut AppState, backup_file: &Path) -> AppResult<CommandResponse<RestoreInfo>> {
    let dataset = BackupService::read_backup(backup_file)?;
    let device_count = dataset.len();
    state.replace_dataset(dataset);
    state.persist()?;
    log_user_operation!("已从 {} 恢复 {} 台设备", backup_file.display(), device_count);

    Ok(CommandResponse::ok(
        format!("已恢复 {} 台设备", device_count),
        RestoreInfo {
            restored_from: backup_file.to_path_buf(),
            device_count,
            saved_to: state.data_location().to_path_buf(),
        },
    ))
}
