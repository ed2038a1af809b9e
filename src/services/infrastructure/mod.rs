/// 基础设施层服务模块
/// 负责与外部文件的交互：台账读写、报告导出

/// Excel读写
pub mod excel;

/// 数据持久化相关模块
pub mod persistence;

// 重新导出常用实现
pub use excel::{ExcelImporter, ExcelWriter};
pub use persistence::ExcelDeviceRepository;
