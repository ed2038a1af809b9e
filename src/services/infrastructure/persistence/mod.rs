/// 数据持久化相关模块

pub mod excel_repository;

pub use excel_repository::ExcelDeviceRepository;
