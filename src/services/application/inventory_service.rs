/// 设备台账维护服务
///
/// 新增、编辑、删除设备，登记维护，按设备类型批量修改维护周期。
/// 每个操作先完成全部校验与计算，再一次性修改记录；校验失败时台账不变。

use chrono::NaiveDate;

use crate::domain::asset_id_allocator::next_asset_id;
use crate::domain::maintenance_evaluator::{initial_next_due, next_due, rescheduled_next_due};
use crate::domain::statistics::interval_mode;
use crate::log_user_operation;
use crate::models::centers::resolve_center;
use crate::models::{AddDeviceRequest, DeviceDataset, DeviceRecord, DeviceUpdate, MaintenanceLogEntry};
use crate::utils::config::MaintenanceConfig;
use crate::utils::error::{AppError, AppResult};

/// 台账维护服务
pub struct InventoryService<'a> {
    dataset: &'a mut DeviceDataset,
    config: &'a MaintenanceConfig,
}

fn required(value: &str, field: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation_error(format!("{}不能为空", field)));
    }
    Ok(value.to_string())
}

impl<'a> InventoryService<'a> {
    pub fn new(dataset: &'a mut DeviceDataset, config: &'a MaintenanceConfig) -> Self {
        Self { dataset, config }
    }

    fn not_found(asset_id: &str) -> AppError {
        AppError::not_found_error("设备", format!("资产编号 {} 不存在", asset_id))
    }

    /// 新增设备，返回新记录
    pub fn add_device(&mut self, request: AddDeviceRequest) -> AppResult<DeviceRecord> {
        let center = resolve_center(&request.center)
            .ok_or_else(|| AppError::validation_error(format!("未知的中心: '{}'", request.center.trim())))?;
        let equipment_name = required(&request.equipment_name, "设备名称")?;
        let department = required(&request.department, "科室")?;
        let interval = match request.maintenance_interval_days {
            Some(days) => self.config.check_interval(days)?,
            None => self.config.default_interval_days,
        };
        let next_maintenance = initial_next_due(request.installation_date, interval)?;

        let asset_id = next_asset_id(&self.dataset.records, center.code);
        let mut record = DeviceRecord::new(asset_id, department, equipment_name);
        record.manufacturer = request.manufacturer.trim().to_string();
        record.model = request.model.trim().to_string();
        record.serial_no = request.serial_no.trim().to_string();
        record.installation_date = request.installation_date;
        record.next_maintenance = next_maintenance;
        record.maintenance_interval_days = interval;
        record.device_status = request.device_status.unwrap_or_default();
        record.priority = request.priority.unwrap_or_default();
        record.notes = request.notes.trim().to_string();

        self.dataset.records.push(record.clone());
        log_user_operation!("新增设备 {} ({}) 到 {}", record.asset_id, record.equipment_name, center.name);
        Ok(record)
    }

    /// 编辑设备，只修改请求中给出的字段
    pub fn edit_device(&mut self, asset_id: &str, update: DeviceUpdate) -> AppResult<DeviceRecord> {
        if update.is_empty() {
            return Err(AppError::validation_error("没有需要修改的字段"));
        }
        let current = self.dataset.find(asset_id).ok_or_else(|| Self::not_found(asset_id))?;

        let equipment_name = update
            .equipment_name
            .as_deref()
            .map(|name| required(name, "设备名称"))
            .transpose()?;
        let department = update
            .department
            .as_deref()
            .map(|name| required(name, "科室"))
            .transpose()?;
        let rescheduled = match update.maintenance_interval_days {
            Some(days) => {
                let interval = self.config.check_interval(days)?;
                Some((interval, rescheduled_next_due(current, interval)?))
            }
            None => None,
        };

        let record = self.dataset.find_mut(asset_id).ok_or_else(|| Self::not_found(asset_id))?;
        if let Some(name) = equipment_name {
            record.equipment_name = name;
        }
        if let Some(department) = department {
            record.department = department;
        }
        if let Some(manufacturer) = update.manufacturer {
            record.manufacturer = manufacturer.trim().to_string();
        }
        if let Some(model) = update.model {
            record.model = model.trim().to_string();
        }
        if let Some(serial_no) = update.serial_no {
            record.serial_no = serial_no.trim().to_string();
        }
        if let Some(status) = update.device_status {
            record.device_status = status;
        }
        if let Some(priority) = update.priority {
            record.priority = priority;
        }
        if let Some(notes) = update.notes {
            record.notes = notes;
        }
        if let Some((interval, next)) = rescheduled {
            record.maintenance_interval_days = interval;
            record.next_maintenance = next;
        }

        log_user_operation!("编辑设备 {}", asset_id);
        Ok(record.clone())
    }

    /// 删除设备；未确认时拒绝执行
    pub fn delete_device(&mut self, asset_id: &str, confirmed: bool) -> AppResult<DeviceRecord> {
        if !confirmed {
            return Err(AppError::business_logic_error(format!(
                "删除设备 {} 需要确认",
                asset_id
            )));
        }
        let index = self
            .dataset
            .records
            .iter()
            .position(|r| r.asset_id == asset_id)
            .ok_or_else(|| Self::not_found(asset_id))?;
        let removed = self.dataset.records.remove(index);
        log_user_operation!("删除设备 {} ({})", removed.asset_id, removed.equipment_name);
        Ok(removed)
    }

    /// 登记一次维护
    ///
    /// 更新最近维护日期、下次维护日期、设备状态与周期，并向维护日志追加一行
    pub fn log_maintenance(
        &mut self,
        asset_id: &str,
        entry: MaintenanceLogEntry,
        today: NaiveDate,
    ) -> AppResult<DeviceRecord> {
        let technician = required(&entry.technician, "技术员")?;
        let current = self.dataset.find(asset_id).ok_or_else(|| Self::not_found(asset_id))?;
        let interval = match entry.next_interval_days {
            Some(days) => self.config.check_interval(days)?,
            None => current.maintenance_interval_days,
        };
        let date = entry.maintenance_date.unwrap_or(today);
        let next = next_due(date, interval)?;
        let line = MaintenanceLogEntry { technician, ..entry.clone() }.note_line(date);

        let record = self.dataset.find_mut(asset_id).ok_or_else(|| Self::not_found(asset_id))?;
        record.last_maintenance = Some(date);
        record.next_maintenance = Some(next);
        record.maintenance_interval_days = interval;
        record.device_status = entry.device_status_after;
        record.append_note(&line);

        log_user_operation!("登记维护 {}: {}，下次维护 {}", asset_id, entry.maintenance_type.label(), next);
        Ok(record.clone())
    }

    /// 批量修改某类设备的维护周期，返回受影响的设备数
    ///
    /// 只有已有维护记录的设备会重新计算下次维护日期
    pub fn bulk_update_interval(&mut self, equipment_name: &str, interval_days: u32) -> AppResult<usize> {
        let interval = self.config.check_interval(interval_days)?;

        let mut updates = Vec::new();
        for (idx, record) in self.dataset.records.iter().enumerate() {
            if record.equipment_name == equipment_name {
                updates.push((idx, rescheduled_next_due(record, interval)?));
            }
        }
        if updates.is_empty() {
            return Err(AppError::not_found_error(
                "设备类型",
                format!("没有名为 '{}' 的设备", equipment_name),
            ));
        }

        for (idx, next) in &updates {
            let record = &mut self.dataset.records[*idx];
            record.maintenance_interval_days = interval;
            record.next_maintenance = *next;
        }

        log_user_operation!("批量修改 {} 的维护周期为 {} 天，共 {} 台", equipment_name, interval, updates.len());
        Ok(updates.len())
    }

    /// 某类设备当前最常见的维护周期；没有该类设备时为默认周期
    pub fn current_interval(&self, equipment_name: &str) -> u32 {
        interval_mode(&self.dataset.records, equipment_name).unwrap_or(self.config.default_interval_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeviceStatus, MaintenanceType, Priority};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dataset() -> DeviceDataset {
        let mut maintained = DeviceRecord::new("KHL-PHC-001", "Lab", "Centrifuge");
        maintained.last_maintenance = Some(date(2024, 1, 1));
        maintained.next_maintenance = Some(date(2024, 3, 31));
        let never_maintained = DeviceRecord::new("KHL-PHC-002", "Lab", "Centrifuge");
        let other = DeviceRecord::new("MHL-PHC-001", "ICU", "Monitor");
        DeviceDataset::new(vec![maintained, never_maintained, other])
    }

    fn add_request() -> AddDeviceRequest {
        AddDeviceRequest {
            center: "الخلاوية".to_string(),
            equipment_name: "ECG".to_string(),
            department: "Emergency".to_string(),
            installation_date: Some(date(2024, 1, 1)),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_device_allocates_id_and_schedule() {
        let mut data = dataset();
        let config = MaintenanceConfig::default();
        let record = InventoryService::new(&mut data, &config).add_device(add_request()).unwrap();

        assert_eq!(record.asset_id, "KHL-PHC-003");
        assert_eq!(record.maintenance_interval_days, 90);
        assert_eq!(record.next_maintenance, Some(date(2024, 3, 31)));
        assert_eq!(record.device_status, DeviceStatus::Working);
        assert_eq!(record.priority, Priority::Medium);
        assert_eq!(data.len(), 4);
    }

    #[test]
    fn test_add_device_by_code_without_installation_date() {
        let mut data = DeviceDataset::default();
        let config = MaintenanceConfig::default();
        let request = AddDeviceRequest {
            center: "sad-phc".to_string(),
            installation_date: None,
            maintenance_interval_days: Some(30),
            ..add_request()
        };
        let record = InventoryService::new(&mut data, &config).add_device(request).unwrap();
        assert_eq!(record.asset_id, "SAD-PHC-001");
        assert_eq!(record.next_maintenance, None);
        assert_eq!(record.maintenance_interval_days, 30);
    }

    #[test]
    fn test_add_device_rejects_invalid_input_without_partial_record() {
        let mut data = dataset();
        let config = MaintenanceConfig::default();
        let mut service = InventoryService::new(&mut data, &config);

        let blank_name = AddDeviceRequest { equipment_name: "  ".to_string(), ..add_request() };
        assert!(matches!(service.add_device(blank_name), Err(AppError::ValidationError { .. })));

        let unknown_center = AddDeviceRequest { center: "Nowhere".to_string(), ..add_request() };
        assert!(service.add_device(unknown_center).is_err());

        let bad_interval = AddDeviceRequest { maintenance_interval_days: Some(400), ..add_request() };
        assert!(service.add_device(bad_interval).is_err());

        assert_eq!(data.len(), 3);
    }

    #[test]
    fn test_log_maintenance_updates_schedule_and_notes() {
        let mut data = dataset();
        let config = MaintenanceConfig::default();
        let entry = MaintenanceLogEntry {
            maintenance_date: Some(date(2024, 3, 1)),
            maintenance_type: MaintenanceType::Repair,
            technician: " Sara ".to_string(),
            notes: "belt replaced".to_string(),
            device_status_after: DeviceStatus::Working,
            next_interval_days: Some(30),
            ..Default::default()
        };
        let record = InventoryService::new(&mut data, &config)
            .log_maintenance("KHL-PHC-002", entry, date(2024, 6, 1))
            .unwrap();

        assert_eq!(record.last_maintenance, Some(date(2024, 3, 1)));
        assert_eq!(record.next_maintenance, Some(date(2024, 3, 31)));
        assert_eq!(record.maintenance_interval_days, 30);
        assert_eq!(record.notes, "[2024-03-01] إصلاح عطل - Sara: belt replaced");
    }

    #[test]
    fn test_log_maintenance_defaults_to_today_and_current_interval() {
        let mut data = dataset();
        data.records[0].notes = "earlier".to_string();
        let config = MaintenanceConfig::default();
        let entry = MaintenanceLogEntry {
            technician: "Ali".to_string(),
            device_status_after: DeviceStatus::UnderMaintenance,
            ..Default::default()
        };
        let record = InventoryService::new(&mut data, &config)
            .log_maintenance("KHL-PHC-001", entry, date(2024, 6, 1))
            .unwrap();

        assert_eq!(record.last_maintenance, Some(date(2024, 6, 1)));
        assert_eq!(record.next_maintenance, Some(date(2024, 8, 30)));
        assert_eq!(record.device_status, DeviceStatus::UnderMaintenance);
        assert!(record.notes.starts_with("earlier\n[2024-06-01]"));
    }

    #[test]
    fn test_log_maintenance_unknown_device() {
        let mut data = dataset();
        let config = MaintenanceConfig::default();
        let entry = MaintenanceLogEntry { technician: "Ali".to_string(), ..Default::default() };
        let result = InventoryService::new(&mut data, &config).log_maintenance("XXX-PHC-001", entry, date(2024, 6, 1));
        assert!(matches!(result, Err(AppError::NotFoundError { .. })));
    }

    #[test]
    fn test_bulk_update_interval() {
        let mut data = dataset();
        let config = MaintenanceConfig::default();
        let updated = InventoryService::new(&mut data, &config)
            .bulk_update_interval("Centrifuge", 30)
            .unwrap();

        assert_eq!(updated, 2);
        assert_eq!(data.records[0].next_maintenance, Some(date(2024, 1, 31)));
        assert_eq!(data.records[1].next_maintenance, None);
        assert_eq!(data.records[1].maintenance_interval_days, 30);
        assert_eq!(data.records[2].maintenance_interval_days, 90);

        let mut service = InventoryService::new(&mut data, &config);
        assert!(service.bulk_update_interval("Centrifuge", 3).is_err());
        assert!(service.bulk_update_interval("Ventilator", 30).is_err());
        assert_eq!(service.current_interval("Centrifuge"), 30);
        assert_eq!(service.current_interval("Ventilator"), 90);
    }

    #[test]
    fn test_edit_device_patch_semantics() {
        let mut data = dataset();
        let config = MaintenanceConfig::default();
        let mut service = InventoryService::new(&mut data, &config);
        let update = DeviceUpdate {
            priority: Some(Priority::High),
            maintenance_interval_days: Some(60),
            ..Default::default()
        };
        let record = service.edit_device("KHL-PHC-001", update).unwrap();
        assert_eq!(record.priority, Priority::High);
        assert_eq!(record.next_maintenance, Some(date(2024, 3, 1)));
        assert_eq!(record.equipment_name, "Centrifuge");

        assert!(service.edit_device("KHL-PHC-001", DeviceUpdate::default()).is_err());
        let blank = DeviceUpdate { department: Some(" ".to_string()), ..Default::default() };
        assert!(service.edit_device("KHL-PHC-001", blank).is_err());
        assert_eq!(data.records[0].department, "Lab");
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut data = dataset();
        let config = MaintenanceConfig::default();
        let mut service = InventoryService::new(&mut data, &config);

        assert!(service.delete_device("KHL-PHC-002", false).is_err());
        let removed = service.delete_device("KHL-PHC-002", true).unwrap();
        assert_eq!(removed.asset_id, "KHL-PHC-002");
        assert!(service.delete_device("KHL-PHC-002", true).is_err());

        let added = service.add_device(add_request()).unwrap();
        assert_eq!(added.asset_id, "KHL-PHC-002");
        assert_eq!(data.len(), 3);
    }
}
