/// 医疗设备台账与预防性维护排程 - 核心库
pub mod app_state;
pub mod commands;
pub mod domain;
pub mod interfaces;
pub mod logging;
pub mod models;
pub mod services;
pub mod utils;

// 重新导出常用类型，方便使用
pub use app_state::AppState;
pub use models::*;
pub use utils::{AppConfig, AppError, AppResult};

use clap::Parser;

/// 应用程序主要运行函数
///
/// 解析命令行参数并执行一次命令
pub fn run() -> anyhow::Result<()> {
    let cli = interfaces::cli::Cli::parse();
    interfaces::cli::run(cli)?;
    Ok(())
}
