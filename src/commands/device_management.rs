/// 设备管理命令：搜索、新增、编辑、删除

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use log::info;

use super::{CommandResponse, ListWithExport};
use crate::domain::statistics::DeviceRow;
use crate::models::{AddDeviceRequest, DeviceRecord, DeviceUpdate};
use crate::services::application::ReportKind;
use crate::utils::error::AppResult;
use crate::AppState;

/// 搜索请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchDevicesRequest {
    pub term: String,
    /// 中心名称或代码
    pub center: Option<String>,
    /// 导出目录，为空时不导出
    pub export_dir: Option<PathBuf>,
}

/// 编辑请求
#[derive(Debug, Clone, Deserialize)]
pub struct EditDeviceRequest {
    pub asset_id: String,
    pub update: DeviceUpdate,
}

/// 删除请求
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteDeviceRequest {
    pub asset_id: String,
    /// 必须显式确认
    pub confirmed: bool,
}

/// 修改类命令的响应数据
#[derive(Debug, Serialize)]
pub struct DeviceChange {
    pub record: DeviceRecord,
    /// 台账写回的文件
    pub saved_to: PathBuf,
}

pub fn search_devices(state: &AppState, request: SearchDevicesRequest) -> AppResult<CommandResponse<ListWithExport<DeviceRow>>> {
    let reports = state.reports();
    let records = reports.search_records(&request.term, request.center.as_deref());
    let exported = match &request.export_dir {
        Some(dir) => Some(reports.export(&ReportKind::DeviceSearch, &records, dir)?),
        None => None,
    };
    let rows = reports.search(&request.term, request.center.as_deref());
    Ok(CommandResponse::ok(
        format!("找到 {} 台设备", rows.len()),
        ListWithExport { rows, exported },
    ))
}

/// 修改后写回台账
fn saved(state: &AppState, message: String, record: DeviceRecord) -> AppResult<CommandResponse<DeviceChange>> {
    state.persist()?;
    info!("{}", message);
    Ok(CommandResponse::ok(
        message,
        DeviceChange {
            record,
            saved_to: state.data_location().to_path_buf(),
        },
    ))
}

pub fn add_device(state: &mut AppState, request: AddDeviceRequest) -> AppResult<CommandResponse<DeviceChange>> {
    let record = state.inventory().add_device(request)?;
    saved(state, format!("已添加设备 {}", record.asset_id), record)
}

pub fn edit_device(state: &mut AppState, request: EditDeviceRequest) -> AppResult<CommandResponse<DeviceChange>> {
    let record = state.inventory().edit_device(&request.asset_id, request.update)?;
    saved(state, format!("已更新设备 {}", record.asset_id), record)
}

pub fn delete_device(state: &mut AppState, request: DeleteDeviceRequest) -> AppResult<CommandResponse<DeviceChange>> {
    let record = state.inventory().delete_device(&request.asset_id, request.confirmed)?;
    saved(state, format!("已删除设备 {}", record.asset_id), record)
}
