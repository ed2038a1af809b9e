/// 基于xlsx文件的设备台账存储

use std::path::{Path, PathBuf};
use log::warn;

use crate::models::DeviceDataset;
use crate::services::infrastructure::excel::{ExcelImporter, ExcelWriter};
use crate::services::traits::DeviceRepository;
use crate::utils::error::AppResult;

/// xlsx 台账文件
#[derive(Debug, Clone)]
pub struct ExcelDeviceRepository {
    data_file: PathBuf,
}

impl ExcelDeviceRepository {
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self { data_file: data_file.into() }
    }
}

impl DeviceRepository for ExcelDeviceRepository {
    fn location(&self) -> &Path {
        &self.data_file
    }

    /// 文件不存在时返回空台账（首次使用）；文件损坏或缺列时报错
    fn load(&self) -> AppResult<DeviceDataset> {
        if !self.data_file.exists() {
            warn!("台账文件 {} 不存在，从空台账开始", self.data_file.display());
            return Ok(DeviceDataset::default());
        }
        ExcelImporter::load_dataset(&self.data_file)
    }

    fn save(&self, dataset: &DeviceDataset) -> AppResult<()> {
        ExcelWriter::save_dataset(&self.data_file, &dataset.records, &dataset.extra_headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DeviceRecord;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_empty_dataset() {
        let dir = TempDir::new().unwrap();
        let repository = ExcelDeviceRepository::new(dir.path().join("devices.xlsx"));
        assert!(repository.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let repository = ExcelDeviceRepository::new(dir.path().join("devices.xlsx"));
        let dataset = DeviceDataset::new(vec![DeviceRecord::new("KHL-PHC-001", "Lab", "Centrifuge")]);

        repository.save(&dataset).unwrap();
        assert_eq!(repository.load().unwrap(), dataset);
        assert_eq!(repository.location(), dir.path().join("devices.xlsx"));
    }
}
