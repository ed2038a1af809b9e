/// 仪表盘命令

use log::debug;

use super::CommandResponse;
use crate::domain::device_filter::DeviceFilter;
use crate::domain::statistics::DashboardSummary;
use crate::utils::error::AppResult;
use crate::AppState;

/// 显示仪表盘
///
/// 筛选条件为空时等同于不过滤；命令行默认只看正常工作的设备
pub fn show_dashboard(state: &AppState, filter: DeviceFilter) -> AppResult<CommandResponse<DashboardSummary>> {
    debug!("仪表盘筛选条件: {:?}", filter);
    let summary = state.reports().dashboard(&filter);
    let message = format!(
        "设备总数 {}，逾期 {}，紧急 {}，故障 {}",
        summary.total, summary.overdue, summary.urgent, summary.broken
    );
    Ok(CommandResponse::ok(message, summary))
}
