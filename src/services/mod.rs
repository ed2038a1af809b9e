/// 服务层模块，按清洁架构分层组织：
/// - Application Layer: 台账维护、报告、备份
/// - Infrastructure Layer: xlsx 读写与台账存储

/// 应用层服务模块
pub mod application;

/// 基础设施层服务模块
pub mod infrastructure;

/// 服务层基础trait定义
pub mod traits;

pub use traits::DeviceRepository;
pub use application::{BackupService, InventoryService, ReportKind, ReportService};
pub use infrastructure::{ExcelDeviceRepository, ExcelImporter, ExcelWriter};
