//! 汇总统计
//!
//! 仪表盘与报告中的各类计数均为按需从当前台账重新计算的派生视图，不做缓存，
//! 因此任何增删改之后立即反映最新数据。

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use statrs::statistics::Statistics;
use std::collections::{BTreeMap, HashMap};

use crate::domain::maintenance_evaluator::{evaluate, URGENT_THRESHOLD_DAYS};
use crate::models::{DeviceRecord, DeviceStatus, MaintenanceStatus, Priority};

/// 图表中最多展示的分组数
pub const TOP_GROUPS: usize = 10;

/// 分组计数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub label: String,
    pub count: usize,
}

/// 列表视图中的一行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceRow {
    pub asset_id: String,
    pub equipment_name: String,
    pub department: String,
    pub manufacturer: String,
    pub model: String,
    pub center_name: Option<String>,
    pub next_maintenance: Option<NaiveDate>,
    pub device_status: DeviceStatus,
    pub priority: Priority,
    pub maintenance_status: MaintenanceStatus,
    pub days_until: Option<i64>,
}

impl DeviceRow {
    pub fn from_record(record: &DeviceRecord, now: NaiveDateTime) -> Self {
        let assessment = evaluate(record, now);
        Self {
            asset_id: record.asset_id.clone(),
            equipment_name: record.equipment_name.clone(),
            department: record.department.clone(),
            manufacturer: record.manufacturer.clone(),
            model: record.model.clone(),
            center_name: record.center_name().map(str::to_string),
            next_maintenance: record.next_maintenance,
            device_status: record.device_status,
            priority: record.priority,
            maintenance_status: assessment.status,
            days_until: assessment.days_until,
        }
    }
}

/// 百分比，总数为0时返回0
pub fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

/// 按维护状态计数（五种状态全部列出，顺序固定）
pub fn count_by_maintenance_status(records: &[&DeviceRecord], now: NaiveDateTime) -> BTreeMap<MaintenanceStatus, usize> {
    let mut counts: BTreeMap<MaintenanceStatus, usize> =
        MaintenanceStatus::ALL.iter().map(|s| (*s, 0)).collect();
    for record in records {
        *counts.entry(evaluate(record, now).status).or_insert(0) += 1;
    }
    counts
}

/// 按设备运行状态计数
pub fn count_by_device_status(records: &[&DeviceRecord]) -> BTreeMap<DeviceStatus, usize> {
    let mut counts: BTreeMap<DeviceStatus, usize> = DeviceStatus::ALL.iter().map(|s| (*s, 0)).collect();
    for record in records {
        *counts.entry(record.device_status).or_insert(0) += 1;
    }
    counts
}

/// 某维护状态的数量
pub fn count_status(records: &[&DeviceRecord], now: NaiveDateTime, status: MaintenanceStatus) -> usize {
    records.iter().filter(|r| evaluate(r, now).status == status).count()
}

/// 按键分组计数，数量降序、同数量按标签升序
fn group_counts<'a, F>(records: impl IntoIterator<Item = &'a DeviceRecord>, key: F) -> Vec<GroupCount>
where
    F: Fn(&DeviceRecord) -> Option<String>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in records {
        if let Some(label) = key(record) {
            *counts.entry(label).or_insert(0) += 1;
        }
    }
    let mut groups: Vec<GroupCount> = counts
        .into_iter()
        .map(|(label, count)| GroupCount { label, count })
        .collect();
    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    groups
}

/// 按中心名称计数（未映射的中心不计入）
pub fn count_by_center(records: &[&DeviceRecord]) -> Vec<GroupCount> {
    group_counts(records.iter().copied(), |r| r.center_name().map(str::to_string))
}

/// 按科室计数
pub fn count_by_department(records: &[&DeviceRecord]) -> Vec<GroupCount> {
    group_counts(records.iter().copied(), |r| {
        let department = r.department.trim();
        (!department.is_empty()).then(|| department.to_string())
    })
}

/// 各中心逾期数量，按数量升序
pub fn overdue_by_center(records: &[&DeviceRecord], now: NaiveDateTime) -> Vec<GroupCount> {
    let overdue = records
        .iter()
        .copied()
        .filter(|r| evaluate(r, now).status == MaintenanceStatus::Overdue);
    let mut groups = group_counts(overdue, |r| r.center_name().map(str::to_string));
    groups.sort_by(|a, b| a.count.cmp(&b.count).then_with(|| a.label.cmp(&b.label)));
    groups
}

/// 平均维护周期（天），无设备时为0
pub fn average_interval_days(records: &[&DeviceRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    records
        .iter()
        .map(|r| f64::from(r.maintenance_interval_days))
        .collect::<Vec<f64>>()
        .mean()
}

/// 某类设备最常见的维护周期；并列时取较小值
pub fn interval_mode(records: &[DeviceRecord], equipment_name: &str) -> Option<u32> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for record in records.iter().filter(|r| r.equipment_name == equipment_name) {
        *counts.entry(record.maintenance_interval_days).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
        .map(|(interval, _)| interval)
}

/// 需要立即维护的设备：剩余不超过7天（含逾期），按到期日升序
pub fn needs_immediate_maintenance(records: &[&DeviceRecord], now: NaiveDateTime, limit: usize) -> Vec<DeviceRow> {
    let mut due: Vec<&DeviceRecord> = records
        .iter()
        .copied()
        .filter(|r| {
            evaluate(r, now)
                .days_until
                .map_or(false, |days| days <= URGENT_THRESHOLD_DAYS)
        })
        .collect();
    due.sort_by_key(|r| r.next_maintenance);
    due.into_iter().take(limit).map(|r| DeviceRow::from_record(r, now)).collect()
}

/// 仪表盘汇总
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total: usize,
    pub working: usize,
    pub overdue: usize,
    pub urgent: usize,
    pub broken: usize,
    pub broken_percent: f64,
    pub devices_by_center: Vec<GroupCount>,
    pub maintenance_status: BTreeMap<MaintenanceStatus, usize>,
    pub needs_attention: Vec<DeviceRow>,
}

pub fn dashboard_summary(records: &[&DeviceRecord], now: NaiveDateTime) -> DashboardSummary {
    let by_status = count_by_device_status(records);
    let maintenance_status = count_by_maintenance_status(records, now);
    let broken = by_status.get(&DeviceStatus::Broken).copied().unwrap_or(0);
    let mut devices_by_center = count_by_center(records);
    devices_by_center.truncate(TOP_GROUPS);

    DashboardSummary {
        total: records.len(),
        working: by_status.get(&DeviceStatus::Working).copied().unwrap_or(0),
        overdue: maintenance_status.get(&MaintenanceStatus::Overdue).copied().unwrap_or(0),
        urgent: maintenance_status.get(&MaintenanceStatus::Urgent).copied().unwrap_or(0),
        broken,
        broken_percent: percent(broken, records.len()),
        devices_by_center,
        maintenance_status,
        needs_attention: needs_immediate_maintenance(records, now, TOP_GROUPS),
    }
}

/// 维护统计
#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceStatistics {
    /// 有维护记录的设备数
    pub completed: usize,
    pub overdue: usize,
    /// 30天内到期（紧急 + 即将到期）
    pub upcoming_30_days: usize,
    pub overdue_by_center: Vec<GroupCount>,
}

pub fn maintenance_statistics(records: &[&DeviceRecord], now: NaiveDateTime) -> MaintenanceStatistics {
    let by_status = count_by_maintenance_status(records, now);
    let get = |status: MaintenanceStatus| by_status.get(&status).copied().unwrap_or(0);
    MaintenanceStatistics {
        completed: records.iter().filter(|r| r.last_maintenance.is_some()).count(),
        overdue: get(MaintenanceStatus::Overdue),
        upcoming_30_days: get(MaintenanceStatus::Urgent) + get(MaintenanceStatus::Upcoming),
        overdue_by_center: overdue_by_center(records, now),
    }
}

/// 综合报告统计
#[derive(Debug, Clone, Serialize)]
pub struct ComprehensiveSummary {
    pub total: usize,
    pub working: usize,
    pub broken: usize,
    pub under_maintenance: usize,
    pub overdue: usize,
    pub overdue_percent: f64,
    pub average_interval_days: f64,
    pub departments: Vec<GroupCount>,
    pub device_status: BTreeMap<DeviceStatus, usize>,
}

pub fn comprehensive_summary(records: &[&DeviceRecord], now: NaiveDateTime) -> ComprehensiveSummary {
    let device_status = count_by_device_status(records);
    let get = |status: DeviceStatus| device_status.get(&status).copied().unwrap_or(0);
    let overdue = count_status(records, now, MaintenanceStatus::Overdue);
    let mut departments = count_by_department(records);
    departments.truncate(TOP_GROUPS);

    ComprehensiveSummary {
        total: records.len(),
        working: get(DeviceStatus::Working),
        broken: get(DeviceStatus::Broken),
        under_maintenance: get(DeviceStatus::UnderMaintenance),
        overdue,
        overdue_percent: percent(overdue, records.len()),
        average_interval_days: average_interval_days(records),
        departments,
        device_status,
    }
}

/// 单个中心的统计
#[derive(Debug, Clone, Serialize)]
pub struct CenterSummary {
    pub center_name: String,
    pub total: usize,
    pub working: usize,
    pub working_percent: f64,
    pub broken: usize,
    pub broken_percent: f64,
    pub overdue: usize,
    pub devices: Vec<DeviceRow>,
}

pub fn center_summary(center_name: &str, records: &[&DeviceRecord], now: NaiveDateTime) -> CenterSummary {
    let by_status = count_by_device_status(records);
    let working = by_status.get(&DeviceStatus::Working).copied().unwrap_or(0);
    let broken = by_status.get(&DeviceStatus::Broken).copied().unwrap_or(0);
    CenterSummary {
        center_name: center_name.to_string(),
        total: records.len(),
        working,
        working_percent: percent(working, records.len()),
        broken,
        broken_percent: percent(broken, records.len()),
        overdue: count_status(records, now, MaintenanceStatus::Overdue),
        devices: records.iter().map(|r| DeviceRow::from_record(r, now)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time_utils::start_of_day;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn device(asset_id: &str, due_in: Option<i64>, status: DeviceStatus) -> DeviceRecord {
        let mut record = DeviceRecord::new(asset_id, "Lab", "Analyzer");
        record.next_maintenance = due_in.map(|d| today() + Duration::days(d));
        record.device_status = status;
        record
    }

    fn sample() -> Vec<DeviceRecord> {
        vec![
            device("KHL-PHC-001", Some(-2), DeviceStatus::Working),
            device("KHL-PHC-002", Some(3), DeviceStatus::Working),
            device("MHL-PHC-001", Some(-10), DeviceStatus::Broken),
            device("MHL-PHC-002", Some(15), DeviceStatus::UnderMaintenance),
            device("MHL-PHC-003", Some(200), DeviceStatus::Working),
            device("MHL-PHC-004", None, DeviceStatus::Working),
        ]
    }

    #[test]
    fn test_maintenance_status_partition_covers_all_records() {
        let records = sample();
        let refs: Vec<&DeviceRecord> = records.iter().collect();
        let counts = count_by_maintenance_status(&refs, start_of_day(today()));
        assert_eq!(counts.values().sum::<usize>(), records.len());
        assert_eq!(counts[&MaintenanceStatus::Overdue], 2);
        assert_eq!(counts[&MaintenanceStatus::Urgent], 1);
        assert_eq!(counts[&MaintenanceStatus::Upcoming], 1);
        assert_eq!(counts[&MaintenanceStatus::Good], 1);
        assert_eq!(counts[&MaintenanceStatus::Undetermined], 1);
    }

    #[test]
    fn test_dashboard_summary() {
        let records = sample();
        let refs: Vec<&DeviceRecord> = records.iter().collect();
        let summary = dashboard_summary(&refs, start_of_day(today()));
        assert_eq!(summary.total, 6);
        assert_eq!(summary.working, 4);
        assert_eq!(summary.broken, 1);
        assert_eq!(summary.overdue, 2);
        assert_eq!(summary.urgent, 1);
        assert!((summary.broken_percent - 100.0 / 6.0).abs() < 1e-9);
        assert_eq!(summary.devices_by_center[0], GroupCount { label: "المحلة".to_string(), count: 4 });

        let attention: Vec<&str> = summary.needs_attention.iter().map(|r| r.asset_id.as_str()).collect();
        assert_eq!(attention, vec!["MHL-PHC-001", "KHL-PHC-001", "KHL-PHC-002"]);
    }

    #[test]
    fn test_overdue_by_center_ascending() {
        let mut records = sample();
        records.push(device("KHL-PHC-003", Some(-1), DeviceStatus::Working));
        let refs: Vec<&DeviceRecord> = records.iter().collect();
        let groups = overdue_by_center(&refs, start_of_day(today()));
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "المحلة");
        assert_eq!(groups[0].count, 1);
        assert_eq!(groups[1].count, 2);
    }

    #[test]
    fn test_deleted_record_leaves_aggregates() {
        let mut records = sample();
        records.retain(|r| r.asset_id != "MHL-PHC-001");
        let refs: Vec<&DeviceRecord> = records.iter().collect();
        let stats = maintenance_statistics(&refs, start_of_day(today()));
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.overdue_by_center.len(), 1);
        assert_eq!(count_by_device_status(&refs)[&DeviceStatus::Broken], 0);
    }

    #[test]
    fn test_comprehensive_and_center_summaries() {
        let mut records = sample();
        records[0].maintenance_interval_days = 30;
        records[1].maintenance_interval_days = 60;
        let refs: Vec<&DeviceRecord> = records.iter().collect();
        let summary = comprehensive_summary(&refs, start_of_day(today()));
        assert_eq!(summary.under_maintenance, 1);
        assert!((summary.average_interval_days - (30.0 + 60.0 + 90.0 * 4.0) / 6.0).abs() < 1e-9);
        assert_eq!(summary.departments, vec![GroupCount { label: "Lab".to_string(), count: 6 }]);

        let center: Vec<&DeviceRecord> = records.iter().filter(|r| r.asset_id.starts_with("MHL")).collect();
        let summary = center_summary("المحلة", &center, start_of_day(today()));
        assert_eq!(summary.total, 4);
        assert_eq!(summary.broken, 1);
        assert!((summary.broken_percent - 25.0).abs() < 1e-9);
        assert_eq!(summary.overdue, 1);
        assert_eq!(summary.devices.len(), 4);
    }

    #[test]
    fn test_interval_mode_prefers_smaller_on_tie() {
        let mut records = sample();
        records[0].maintenance_interval_days = 30;
        records[1].maintenance_interval_days = 30;
        records[2].maintenance_interval_days = 60;
        records[3].maintenance_interval_days = 60;
        records[4].maintenance_interval_days = 180;
        records[5].maintenance_interval_days = 180;
        assert_eq!(interval_mode(&records, "Analyzer"), Some(30));
        assert_eq!(interval_mode(&records, "Ventilator"), None);
        assert_eq!(percent(1, 0), 0.0);
    }
}
