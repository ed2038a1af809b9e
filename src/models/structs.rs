//! 核心数据结构
//!
//! 设备台账的一行对应一个 [`DeviceRecord`]，字段按台账文件的列一一对应；
//! 缺省值只在加载时填充一次，之后的业务逻辑不再做空值判断。

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::centers::{center_code_of, center_name_for_code};
use super::enums::{DeviceStatus, MaintenanceType, Priority};

/// 新设备的默认维护周期（天）
pub const DEFAULT_INTERVAL_DAYS: u32 = 90;

/// 台账文件列名
pub mod columns {
    pub const ASSET_ID: &str = "Asset ID";
    pub const DEPARTMENT: &str = "Scientific Department";
    pub const EQUIPMENT_NAME: &str = "Scientific Equipment Name";
    pub const MANUFACTURER: &str = "Manufacturer";
    pub const MODEL: &str = "Model";
    pub const SERIAL_NO: &str = "Serial No";
    pub const INSTALLATION_DATE: &str = "Installation Date";
    pub const LAST_MAINTENANCE: &str = "Last_Maintenance";
    pub const NEXT_MAINTENANCE: &str = "Next_Maintenance";
    pub const INTERVAL_DAYS: &str = "Maintenance_Interval_Days";
    pub const DEVICE_STATUS: &str = "Device_Status";
    pub const PRIORITY: &str = "Priority";
    pub const NOTES: &str = "Notes";

    /// 派生列：只出现在导出报告中，保存台账时剔除
    pub const CENTER_CODE: &str = "Center_Code";
    pub const CENTER_NAME: &str = "Center_Name";
    pub const MAINTENANCE_STATUS: &str = "Maintenance_Status";

    /// 必需列
    pub const REQUIRED: [&str; 7] = [
        ASSET_ID,
        DEPARTMENT,
        EQUIPMENT_NAME,
        MANUFACTURER,
        MODEL,
        SERIAL_NO,
        INSTALLATION_DATE,
    ];

    /// 台账文件中建模列的规范顺序
    pub const MODELED: [&str; 13] = [
        ASSET_ID,
        DEPARTMENT,
        EQUIPMENT_NAME,
        MANUFACTURER,
        MODEL,
        SERIAL_NO,
        INSTALLATION_DATE,
        LAST_MAINTENANCE,
        NEXT_MAINTENANCE,
        INTERVAL_DAYS,
        DEVICE_STATUS,
        PRIORITY,
        NOTES,
    ];

    pub const DERIVED: [&str; 3] = [CENTER_CODE, CENTER_NAME, MAINTENANCE_STATUS];
}

/// 设备记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// 资产编号 `<中心代码>-<三位序号>`
    pub asset_id: String,
    pub department: String,
    pub equipment_name: String,
    pub manufacturer: String,
    pub model: String,
    pub serial_no: String,
    pub installation_date: Option<NaiveDate>,
    pub last_maintenance: Option<NaiveDate>,
    /// 下次维护日期；没有安装日期也没有维护记录时为空
    pub next_maintenance: Option<NaiveDate>,
    pub maintenance_interval_days: u32,
    pub device_status: DeviceStatus,
    pub priority: Priority,
    /// 维护日志，只追加
    pub notes: String,
    /// 未建模的列（如 `PPM Done`），原样保留
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_columns: BTreeMap<String, String>,
}

impl DeviceRecord {
    /// 创建带缺省值的设备记录
    pub fn new(
        asset_id: impl Into<String>,
        department: impl Into<String>,
        equipment_name: impl Into<String>,
    ) -> Self {
        Self {
            asset_id: asset_id.into(),
            department: department.into(),
            equipment_name: equipment_name.into(),
            manufacturer: String::new(),
            model: String::new(),
            serial_no: String::new(),
            installation_date: None,
            last_maintenance: None,
            next_maintenance: None,
            maintenance_interval_days: DEFAULT_INTERVAL_DAYS,
            device_status: DeviceStatus::default(),
            priority: Priority::default(),
            notes: String::new(),
            extra_columns: BTreeMap::new(),
        }
    }

    /// 中心代码（由资产编号派生）
    pub fn center_code(&self) -> String {
        center_code_of(&self.asset_id)
    }

    /// 中心名称；前缀不在参照表中时为空
    pub fn center_name(&self) -> Option<&'static str> {
        center_name_for_code(&self.center_code())
    }

    /// 向维护日志追加一行
    pub fn append_note(&mut self, line: &str) {
        if self.notes.trim().is_empty() {
            self.notes = line.to_string();
        } else {
            self.notes.push('\n');
            self.notes.push_str(line);
        }
    }
}

/// 会话内的设备台账
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceDataset {
    pub records: Vec<DeviceRecord>,
    /// 未建模列的表头，保持文件中的原始顺序
    pub extra_headers: Vec<String>,
}

impl DeviceDataset {
    pub fn new(records: Vec<DeviceRecord>) -> Self {
        Self { records, extra_headers: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, asset_id: &str) -> Option<&DeviceRecord> {
        self.records.iter().find(|r| r.asset_id == asset_id)
    }

    pub fn find_mut(&mut self, asset_id: &str) -> Option<&mut DeviceRecord> {
        self.records.iter_mut().find(|r| r.asset_id == asset_id)
    }
}

/// 新增设备请求（对应"添加设备"表单）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddDeviceRequest {
    /// 中心名称或中心代码（必填）
    pub center: String,
    /// 设备名称（必填）
    pub equipment_name: String,
    /// 科室（必填）
    pub department: String,
    pub manufacturer: String,
    pub model: String,
    pub serial_no: String,
    pub installation_date: Option<NaiveDate>,
    pub device_status: Option<DeviceStatus>,
    /// 为空时使用配置中的默认周期
    pub maintenance_interval_days: Option<u32>,
    pub priority: Option<Priority>,
    pub notes: String,
}

/// 编辑设备请求，只修改给出的字段
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceUpdate {
    pub equipment_name: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub serial_no: Option<String>,
    pub department: Option<String>,
    pub device_status: Option<DeviceStatus>,
    pub priority: Option<Priority>,
    pub maintenance_interval_days: Option<u32>,
    /// 整体替换维护日志
    pub notes: Option<String>,
}

impl DeviceUpdate {
    pub fn is_empty(&self) -> bool {
        self.equipment_name.is_none()
            && self.manufacturer.is_none()
            && self.model.is_none()
            && self.serial_no.is_none()
            && self.department.is_none()
            && self.device_status.is_none()
            && self.priority.is_none()
            && self.maintenance_interval_days.is_none()
            && self.notes.is_none()
    }
}

/// 维护登记（对应"登记维护"表单）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaintenanceLogEntry {
    /// 完成日期，为空时取当天
    pub maintenance_date: Option<NaiveDate>,
    pub maintenance_type: MaintenanceType,
    pub technician: String,
    pub notes: String,
    pub parts_replaced: String,
    /// 维护后的设备状态
    pub device_status_after: DeviceStatus,
    /// 下次维护间隔，为空时沿用设备当前周期
    pub next_interval_days: Option<u32>,
}

impl MaintenanceLogEntry {
    /// 追加到设备维护日志中的一行
    pub fn note_line(&self, date: NaiveDate) -> String {
        let mut line = format!(
            "[{}] {} - {}: {}",
            date.format("%Y-%m-%d"),
            self.maintenance_type.label(),
            self.technician.trim(),
            self.notes.trim()
        );
        if !self.parts_replaced.trim().is_empty() {
            line.push_str(" | ");
            line.push_str(self.parts_replaced.trim());
        }
        line
    }
}
