//! 设备筛选、搜索与维护计划视图
//!
//! 空的筛选列表表示不过滤该维度

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::maintenance_evaluator::evaluate;
use crate::models::{DeviceRecord, DeviceStatus, MaintenanceStatus, Priority, ScheduleWindow};

/// 通用设备筛选条件（仪表盘、自定义报告、搜索共用）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceFilter {
    /// 中心名称或代码
    pub centers: Vec<String>,
    pub departments: Vec<String>,
    pub statuses: Vec<DeviceStatus>,
    pub priorities: Vec<Priority>,
    /// 按设备名称、序列号、型号模糊匹配（不区分大小写）
    pub search_term: Option<String>,
}

impl DeviceFilter {
    /// 仪表盘默认只看正常工作的设备
    pub fn dashboard_default() -> Self {
        Self {
            statuses: vec![DeviceStatus::Working],
            ..Default::default()
        }
    }

    pub fn matches(&self, record: &DeviceRecord) -> bool {
        (self.centers.is_empty() || self.centers.iter().any(|c| matches_center(record, c)))
            && (self.departments.is_empty()
                || self.departments.iter().any(|d| d.trim() == record.department.trim()))
            && (self.statuses.is_empty() || self.statuses.contains(&record.device_status))
            && (self.priorities.is_empty() || self.priorities.contains(&record.priority))
            && self
                .search_term
                .as_deref()
                .map_or(true, |term| matches_search(record, term))
    }

    pub fn apply<'a>(&self, records: &'a [DeviceRecord]) -> Vec<&'a DeviceRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

/// 记录是否属于给定中心（名称或代码）
pub fn matches_center(record: &DeviceRecord, center: &str) -> bool {
    let center = center.trim();
    record.center_name() == Some(center) || record.center_code().eq_ignore_ascii_case(center)
}

/// 搜索词匹配设备名称、序列号或型号
pub fn matches_search(record: &DeviceRecord, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    [&record.equipment_name, &record.serial_no, &record.model]
        .iter()
        .any(|field| field.to_lowercase().contains(&term))
}

/// 维护计划查询条件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleQuery {
    pub window: ScheduleWindow,
    pub priorities: Vec<Priority>,
    pub center: Option<String>,
}

impl Default for ScheduleQuery {
    fn default() -> Self {
        Self {
            window: ScheduleWindow::Overdue,
            priorities: vec![Priority::High, Priority::Medium],
            center: None,
        }
    }
}

/// 维护计划中的一行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleRow {
    pub asset_id: String,
    pub equipment_name: String,
    pub center_name: Option<String>,
    pub next_maintenance: NaiveDate,
    pub days_until: i64,
    pub priority: Priority,
    pub status: MaintenanceStatus,
    pub icon: String,
}

/// 剩余天数是否落在时间窗内
pub fn in_window(window: ScheduleWindow, days_until: i64) -> bool {
    match window {
        ScheduleWindow::Overdue => days_until < 0,
        ScheduleWindow::All => true,
        other => {
            let horizon = other.horizon_days().unwrap_or(i64::MAX);
            (0..=horizon).contains(&days_until)
        }
    }
}

/// 已排程设备中满足条件的记录，按优先级（高优先）再按到期日升序
pub fn scheduled_records<'a>(
    records: &'a [DeviceRecord],
    query: &ScheduleQuery,
    now: NaiveDateTime,
) -> Vec<&'a DeviceRecord> {
    let mut selected: Vec<(&DeviceRecord, i64)> = records
        .iter()
        .filter_map(|record| evaluate(record, now).days_until.map(|days| (record, days)))
        .filter(|(_, days)| in_window(query.window, *days))
        .filter(|(record, _)| query.priorities.is_empty() || query.priorities.contains(&record.priority))
        .filter(|(record, _)| query.center.as_deref().map_or(true, |c| matches_center(record, c)))
        .collect();

    selected.sort_by(|(a, _), (b, _)| {
        a.priority
            .rank()
            .cmp(&b.priority.rank())
            .then_with(|| a.next_maintenance.cmp(&b.next_maintenance))
    });
    selected.into_iter().map(|(record, _)| record).collect()
}

/// 维护计划视图
pub fn schedule(records: &[DeviceRecord], query: &ScheduleQuery, now: NaiveDateTime) -> Vec<ScheduleRow> {
    scheduled_records(records, query, now)
        .into_iter()
        .filter_map(|record| {
            let assessment = evaluate(record, now);
            Some(ScheduleRow {
                asset_id: record.asset_id.clone(),
                equipment_name: record.equipment_name.clone(),
                center_name: record.center_name().map(str::to_string),
                next_maintenance: record.next_maintenance?,
                days_until: assessment.days_until?,
                priority: record.priority,
                status: assessment.status,
                icon: assessment.status.icon().to_string(),
            })
        })
        .collect()
}
