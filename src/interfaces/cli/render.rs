//! 命令结果的文本呈现

use std::fmt::Write;

use crate::commands::device_management::DeviceChange;
use crate::commands::reports::ReportOutput;
use crate::commands::settings::{IntervalInfo, RestoreInfo};
use crate::commands::ListWithExport;
use crate::domain::device_filter::ScheduleRow;
use crate::domain::statistics::{
    CenterSummary, ComprehensiveSummary, DashboardSummary, DeviceRow, GroupCount, MaintenanceStatistics,
};
use crate::models::MaintenanceStatus;
use crate::utils::config::NotificationConfig;

fn date_or_dash(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_else(|| "-".to_string())
}

fn groups(out: &mut String, title: &str, groups: &[GroupCount]) {
    let _ = writeln!(out, "{}:", title);
    if groups.is_empty() {
        let _ = writeln!(out, "  (无)");
    }
    for group in groups {
        let _ = writeln!(out, "  {:<24} {:>6}", group.label, group.count);
    }
}

pub fn device_rows(rows: &[DeviceRow]) -> String {
    let mut out = String::new();
    for row in rows {
        let _ = writeln!(
            out,
            "{} {:<14} {:<28} {:<16} {:<12} {:<8} {}",
            row.maintenance_status.icon(),
            row.asset_id,
            row.equipment_name,
            row.center_name.as_deref().unwrap_or("-"),
            row.device_status.label(),
            row.priority.label(),
            date_or_dash(row.next_maintenance),
        );
    }
    out
}

pub fn device_list(list: &ListWithExport<DeviceRow>) -> String {
    let mut out = device_rows(&list.rows);
    if let Some(path) = &list.exported {
        let _ = writeln!(out, "已导出: {}", path.display());
    }
    out
}

pub fn schedule(list: &ListWithExport<ScheduleRow>) -> String {
    let mut out = String::new();
    for row in &list.rows {
        let _ = writeln!(
            out,
            "{} {:<14} {:<28} {:<16} {} {:>5} 天  {}",
            row.icon,
            row.asset_id,
            row.equipment_name,
            row.center_name.as_deref().unwrap_or("-"),
            row.next_maintenance.format("%Y-%m-%d"),
            row.days_until,
            row.priority.label(),
        );
    }
    if let Some(path) = &list.exported {
        let _ = writeln!(out, "已导出: {}", path.display());
    }
    out
}

pub fn dashboard(summary: &DashboardSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "设备总数     {}", summary.total);
    let _ = writeln!(out, "正常工作     {}", summary.working);
    let _ = writeln!(out, "逾期维护     {}", summary.overdue);
    let _ = writeln!(out, "紧急维护     {}", summary.urgent);
    let _ = writeln!(out, "故障设备     {} ({:.1}%)", summary.broken, summary.broken_percent);
    out.push('\n');
    groups(&mut out, "各中心设备数", &summary.devices_by_center);
    out.push('\n');
    let _ = writeln!(out, "维护状态分布:");
    for status in MaintenanceStatus::ALL {
        let count = summary.maintenance_status.get(&status).copied().unwrap_or(0);
        let _ = writeln!(out, "  {} {:<20} {:>6}", status.icon(), status.label(), count);
    }
    out.push('\n');
    if summary.needs_attention.is_empty() {
        let _ = writeln!(out, "没有需要立即维护的设备");
    } else {
        let _ = writeln!(out, "需要立即维护:");
        out.push_str(&device_rows(&summary.needs_attention));
    }
    out
}

pub fn maintenance_statistics(stats: &MaintenanceStatistics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "已完成维护   {}", stats.completed);
    let _ = writeln!(out, "逾期维护     {}", stats.overdue);
    let _ = writeln!(out, "30天内到期   {}", stats.upcoming_30_days);
    groups(&mut out, "各中心逾期数", &stats.overdue_by_center);
    out
}

fn exported_line(out: &mut String, exported: &Option<std::path::PathBuf>) {
    if let Some(path) = exported {
        let _ = writeln!(out, "已导出: {}", path.display());
    }
}

pub fn comprehensive(output: &ReportOutput<ComprehensiveSummary>) -> String {
    let report = &output.report;
    let mut out = String::new();
    let _ = writeln!(out, "设备总数     {}", report.total);
    let _ = writeln!(out, "正常工作     {}", report.working);
    let _ = writeln!(out, "故障         {}", report.broken);
    let _ = writeln!(out, "维护中       {}", report.under_maintenance);
    let _ = writeln!(out, "逾期维护     {} ({:.1}%)", report.overdue, report.overdue_percent);
    let _ = writeln!(out, "平均维护周期 {:.0} 天", report.average_interval_days);
    groups(&mut out, "设备最多的科室", &report.departments);
    exported_line(&mut out, &output.exported);
    out
}

pub fn center(output: &ReportOutput<CenterSummary>) -> String {
    let report = &output.report;
    let mut out = String::new();
    let _ = writeln!(out, "{}", report.center_name);
    let _ = writeln!(out, "设备总数     {}", report.total);
    let _ = writeln!(out, "正常工作     {} ({:.1}%)", report.working, report.working_percent);
    let _ = writeln!(out, "故障         {} ({:.1}%)", report.broken, report.broken_percent);
    let _ = writeln!(out, "逾期维护     {}", report.overdue);
    out.push_str(&device_rows(&report.devices));
    exported_line(&mut out, &output.exported);
    out
}

pub fn custom(output: &ReportOutput<Vec<DeviceRow>>) -> String {
    let mut out = device_rows(&output.report);
    exported_line(&mut out, &output.exported);
    out
}

pub fn device_change(change: &DeviceChange) -> String {
    let record = &change.record;
    let mut out = String::new();
    let _ = writeln!(out, "资产编号     {}", record.asset_id);
    let _ = writeln!(out, "设备名称     {}", record.equipment_name);
    let _ = writeln!(out, "科室         {}", record.department);
    let _ = writeln!(out, "中心         {}", record.center_name().unwrap_or("-"));
    let _ = writeln!(out, "设备状态     {}", record.device_status.label());
    let _ = writeln!(out, "优先级       {}", record.priority.label());
    let _ = writeln!(out, "维护周期     {} 天", record.maintenance_interval_days);
    let _ = writeln!(out, "最近维护     {}", date_or_dash(record.last_maintenance));
    let _ = writeln!(out, "下次维护     {}", date_or_dash(record.next_maintenance));
    let _ = writeln!(out, "台账文件     {}", change.saved_to.display());
    out
}

pub fn interval(info: &IntervalInfo) -> String {
    format!("{}: {} 天（本次更新 {} 台）\n", info.equipment_name, info.current_interval_days, info.updated)
}

pub fn notifications(config: &NotificationConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "提前提醒天数 {}", config.notify_days_before);
    let _ = writeln!(out, "提醒逾期     {}", if config.notify_overdue { "是" } else { "否" });
    let _ = writeln!(out, "通知邮箱     {}", config.notify_email.as_deref().unwrap_or("-"));
    out
}

pub fn restore(info: &RestoreInfo) -> String {
    format!(
        "来源 {}，设备 {} 台，已写回 {}\n",
        info.restored_from.display(),
        info.device_count,
        info.saved_to.display()
    )
}
