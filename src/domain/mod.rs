//! 领域层模块
//!
//! 维护状态评估、资产编号分配、筛选与统计，全部为不依赖存储的纯逻辑

pub mod maintenance_evaluator;
pub mod asset_id_allocator;
pub mod device_filter;
pub mod statistics;

pub use maintenance_evaluator::{evaluate, MaintenanceAssessment};
pub use device_filter::{DeviceFilter, ScheduleQuery, ScheduleRow};
