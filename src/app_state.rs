//! 应用状态
//!
//! 一次会话（一次命令行调用）内的全部状态：台账、配置、存储与时钟。
//! 所有命令都显式接收 `AppState`，不存在全局可变台账。

use chrono::{NaiveDate, NaiveDateTime};
use log::info;
use std::path::Path;

use crate::models::DeviceDataset;
use crate::services::application::{InventoryService, ReportService};
use crate::services::traits::DeviceRepository;
use crate::utils::config::{AppConfig, ConfigManager};
use crate::utils::error::AppResult;
use crate::utils::time_utils::Clock;

pub struct AppState {
    pub dataset: DeviceDataset,
    config_manager: ConfigManager,
    repository: Box<dyn DeviceRepository>,
    clock: Box<dyn Clock>,
}

impl AppState {
    /// 从存储加载台账并创建应用状态；加载失败时不创建
    pub fn load(
        config_manager: ConfigManager,
        repository: Box<dyn DeviceRepository>,
        clock: Box<dyn Clock>,
    ) -> AppResult<Self> {
        let dataset = repository.load()?;
        info!("已从 {} 加载 {} 台设备", repository.location().display(), dataset.len());
        Ok(Self::with_dataset(config_manager, repository, clock, dataset))
    }

    pub fn with_dataset(
        config_manager: ConfigManager,
        repository: Box<dyn DeviceRepository>,
        clock: Box<dyn Clock>,
        dataset: DeviceDataset,
    ) -> Self {
        Self {
            dataset,
            config_manager,
            repository,
            clock,
        }
    }

    pub fn config(&self) -> &AppConfig {
        self.config_manager.get_config()
    }

    pub fn config_manager(&self) -> &ConfigManager {
        &self.config_manager
    }

    pub fn config_manager_mut(&mut self) -> &mut ConfigManager {
        &mut self.config_manager
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }

    pub fn data_location(&self) -> &Path {
        self.repository.location()
    }

    /// 台账维护服务
    pub fn inventory(&mut self) -> InventoryService<'_> {
        InventoryService::new(&mut self.dataset, &self.config_manager.get_config().maintenance_config)
    }

    /// 报告服务（以当前时刻为参考）
    pub fn reports(&self) -> ReportService<'_> {
        ReportService::new(&self.dataset, self.now())
    }

    /// 整体写回台账；失败时内存中的修改保留
    pub fn persist(&self) -> AppResult<()> {
        self.repository.save(&self.dataset)
    }

    /// 用恢复的台账替换当前台账
    pub fn replace_dataset(&mut self, dataset: DeviceDataset) {
        info!("台账已替换: {} → {} 台设备", self.dataset.len(), dataset.len());
        self.dataset = dataset;
    }
}
