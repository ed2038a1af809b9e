/// 应用层服务模块
///
/// 协调领域逻辑与基础设施，实现面向用户的完整操作

pub mod inventory_service;
pub mod report_service;
pub mod backup_service;

pub use inventory_service::InventoryService;
pub use report_service::{ReportKind, ReportService};
pub use backup_service::BackupService;
