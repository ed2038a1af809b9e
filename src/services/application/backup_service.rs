/// 备份与恢复服务

use chrono::NaiveDateTime;
use log::info;
use std::path::{Path, PathBuf};

use crate::log_file_parsing_failure;
use crate::models::{DeviceDataset, DeviceRecord};
use crate::services::infrastructure::excel::{ExcelImporter, ExcelWriter};
use crate::utils::error::AppResult;
use crate::utils::time_utils::datetime_stamp;

pub struct BackupService;

impl BackupService {
    /// 备份文件名 `backup_<YYYYMMDD_HHMMSS>.xlsx`
    pub fn backup_file_name(now: NaiveDateTime) -> String {
        format!("backup_{}.xlsx", datetime_stamp(now))
    }

    /// 把整个台账（含派生列）导出到备份目录
    pub fn create_backup(dataset: &DeviceDataset, backup_dir: &Path, now: NaiveDateTime) -> AppResult<PathBuf> {
        let records: Vec<&DeviceRecord> = dataset.records.iter().collect();
        let bytes = ExcelWriter::export_report(&records, &dataset.extra_headers, now)?;
        let path = backup_dir.join(Self::backup_file_name(now));
        ExcelWriter::write_atomically(&path, &bytes)?;
        info!("已创建备份 {}，共 {} 台设备", path.display(), records.len());
        Ok(path)
    }

    /// 完整解析备份文件；解析失败时不返回任何部分结果
    pub fn read_backup(path: &Path) -> AppResult<DeviceDataset> {
        ExcelImporter::load_dataset(path).map_err(|e| {
            log_file_parsing_failure!("备份文件 {} 无法恢复: {}", path.display(), e);
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time_utils::start_of_day;
    use chrono::{Duration, NaiveDate};
    use tempfile::TempDir;

    #[test]
    fn test_backup_then_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let now = start_of_day(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()) + Duration::seconds(3723);
        let mut record = DeviceRecord::new("ASH-PHC-010", "Lab", "Microscope");
        record.next_maintenance = NaiveDate::from_ymd_opt(2024, 9, 1);
        let dataset = DeviceDataset::new(vec![record]);

        let path = BackupService::create_backup(&dataset, &dir.path().join("backups"), now).unwrap();
        assert!(path.ends_with("backup_20240601_010203.xlsx"));

        let restored = BackupService::read_backup(&path).unwrap();
        assert_eq!(restored, dataset);
    }

    #[test]
    fn test_read_invalid_backup_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("not_a_workbook.xlsx");
        std::fs::write(&path, b"plain text").unwrap();
        assert!(BackupService::read_backup(&path).is_err());
    }
}
