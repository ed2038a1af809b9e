/// 维护命令：维护计划、登记维护、维护统计

use serde::Deserialize;
use std::path::PathBuf;

use super::device_management::DeviceChange;
use super::{CommandResponse, ListWithExport};
use crate::domain::device_filter::{ScheduleQuery, ScheduleRow};
use crate::domain::statistics::MaintenanceStatistics;
use crate::models::MaintenanceLogEntry;
use crate::services::application::ReportKind;
use crate::utils::error::AppResult;
use crate::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleRequest {
    pub query: ScheduleQuery,
    pub export_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogMaintenanceRequest {
    pub asset_id: String,
    pub entry: MaintenanceLogEntry,
}

pub fn maintenance_schedule(state: &AppState, request: ScheduleRequest) -> AppResult<CommandResponse<ListWithExport<ScheduleRow>>> {
    let reports = state.reports();
    let exported = match &request.export_dir {
        Some(dir) => {
            let records = reports.schedule_records(&request.query);
            Some(reports.export(&ReportKind::Schedule, &records, dir)?)
        }
        None => None,
    };
    let rows = reports.schedule(&request.query);
    Ok(CommandResponse::ok(
        format!("计划内设备 {} 台", rows.len()),
        ListWithExport { rows, exported },
    ))
}

pub fn log_maintenance(state: &mut AppState, request: LogMaintenanceRequest) -> AppResult<CommandResponse<DeviceChange>> {
    let today = state.today();
    let record = state
        .inventory()
        .log_maintenance(&request.asset_id, request.entry, today)?;
    state.persist()?;

    let message = match record.next_maintenance {
        Some(next) => format!("已登记 {} 的维护，下次维护日期 {}", record.asset_id, next),
        None => format!("已登记 {} 的维护", record.asset_id),
    };
    Ok(CommandResponse::ok(
        message,
        DeviceChange {
            record,
            saved_to: state.data_location().to_path_buf(),
        },
    ))
}

pub fn maintenance_statistics(state: &AppState) -> AppResult<CommandResponse<MaintenanceStatistics>> {
    let stats = state.reports().maintenance_statistics();
    Ok(CommandResponse::ok(
        format!(
            "已维护 {}，逾期 {}，30天内到期 {}",
            stats.completed, stats.overdue, stats.upcoming_30_days
        ),
        stats,
    ))
}
