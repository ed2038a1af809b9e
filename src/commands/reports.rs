/// 报告命令：综合报告、中心报告、自定义报告

use serde::Serialize;
use std::path::PathBuf;

use super::CommandResponse;
use crate::domain::device_filter::DeviceFilter;
use crate::domain::statistics::{CenterSummary, ComprehensiveSummary, DeviceRow};
use crate::services::application::ReportKind;
use crate::utils::error::AppResult;
use crate::AppState;

/// 报告结果
#[derive(Debug, Serialize)]
pub struct ReportOutput<T> {
    pub report: T,
    pub exported: Option<PathBuf>,
}

pub fn comprehensive_report(state: &AppState, export_dir: Option<PathBuf>) -> AppResult<CommandResponse<ReportOutput<ComprehensiveSummary>>> {
    let reports = state.reports();
    let report = reports.comprehensive();
    let exported = match export_dir {
        Some(dir) => Some(reports.export(&ReportKind::Comprehensive, &reports.all_records(), &dir)?),
        None => None,
    };
    Ok(CommandResponse::ok(
        format!("综合报告: 设备 {} 台，逾期 {:.1}%", report.total, report.overdue_percent),
        ReportOutput { report, exported },
    ))
}

pub fn center_report(state: &AppState, center: &str, export_dir: Option<PathBuf>) -> AppResult<CommandResponse<ReportOutput<CenterSummary>>> {
    let reports = state.reports();
    let (report, records) = reports.center_report(center)?;
    let exported = match export_dir {
        Some(dir) => Some(reports.export(&ReportKind::Center(report.center_name.clone()), &records, &dir)?),
        None => None,
    };
    Ok(CommandResponse::ok(
        format!("{}: 设备 {} 台", report.center_name, report.total),
        ReportOutput { report, exported },
    ))
}

pub fn custom_report(state: &AppState, filter: DeviceFilter, export_dir: Option<PathBuf>) -> AppResult<CommandResponse<ReportOutput<Vec<DeviceRow>>>> {
    let reports = state.reports();
    let (report, records) = reports.custom(&filter);
    let exported = match export_dir {
        Some(dir) => Some(reports.export(&ReportKind::Custom, &records, &dir)?),
        None => None,
    };
    Ok(CommandResponse::ok(
        format!("符合条件的设备 {} 台", report.len()),
        ReportOutput { report, exported },
    ))
}
