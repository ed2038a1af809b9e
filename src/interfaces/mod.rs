//! 外部接口层

/// 命令行界面
pub mod cli;
