/// 报告与视图服务
///
/// 仪表盘、搜索、维护计划、统计与各类报告都从当前台账即时计算；
/// 导出时生成 xlsx 报告并写入指定目录。

use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::domain::device_filter::{scheduled_records, schedule, DeviceFilter, ScheduleQuery, ScheduleRow};
use crate::domain::statistics::{
    center_summary, comprehensive_summary, dashboard_summary, maintenance_statistics, CenterSummary,
    ComprehensiveSummary, DashboardSummary, DeviceRow, MaintenanceStatistics,
};
use crate::models::centers::resolve_center;
use crate::models::{DeviceDataset, DeviceRecord};
use crate::services::infrastructure::excel::ExcelWriter;
use crate::utils::error::{AppError, AppResult};
use crate::utils::time_utils::date_stamp;

/// 可导出的报告类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ReportKind {
    DeviceSearch,
    Schedule,
    Comprehensive,
    /// 单个中心（中心名称）
    Center(String),
    Custom,
}

impl ReportKind {
    /// 导出文件名 `<类型>_<YYYYMMDD>.xlsx`
    pub fn file_name(&self, now: NaiveDateTime) -> String {
        let stem = match self {
            ReportKind::DeviceSearch => "devices_search".to_string(),
            ReportKind::Schedule => "maintenance_schedule".to_string(),
            ReportKind::Comprehensive => "comprehensive_report".to_string(),
            ReportKind::Center(name) => format!("report_{}", name),
            ReportKind::Custom => "custom_report".to_string(),
        };
        format!("{}_{}.xlsx", stem, date_stamp(now))
    }
}

/// 报告服务
pub struct ReportService<'a> {
    dataset: &'a DeviceDataset,
    now: NaiveDateTime,
}

impl<'a> ReportService<'a> {
    pub fn new(dataset: &'a DeviceDataset, now: NaiveDateTime) -> Self {
        Self { dataset, now }
    }

    fn all(&self) -> Vec<&'a DeviceRecord> {
        self.dataset.records.iter().collect()
    }

    fn rows(&self, records: &[&DeviceRecord]) -> Vec<DeviceRow> {
        records.iter().map(|r| DeviceRow::from_record(r, self.now)).collect()
    }

    /// 仪表盘
    pub fn dashboard(&self, filter: &DeviceFilter) -> DashboardSummary {
        dashboard_summary(&filter.apply(&self.dataset.records), self.now)
    }

    /// 搜索结果对应的记录
    pub fn search_records(&self, term: &str, center: Option<&str>) -> Vec<&'a DeviceRecord> {
        let filter = DeviceFilter {
            centers: center.map(|c| vec![c.to_string()]).unwrap_or_default(),
            search_term: Some(term.to_string()),
            ..Default::default()
        };
        filter.apply(&self.dataset.records)
    }

    /// 搜索设备
    pub fn search(&self, term: &str, center: Option<&str>) -> Vec<DeviceRow> {
        self.rows(&self.search_records(term, center))
    }

    /// 维护计划
    pub fn schedule(&self, query: &ScheduleQuery) -> Vec<ScheduleRow> {
        schedule(&self.dataset.records, query, self.now)
    }

    /// 维护计划对应的记录（导出用）
    pub fn schedule_records(&self, query: &ScheduleQuery) -> Vec<&'a DeviceRecord> {
        scheduled_records(&self.dataset.records, query, self.now)
    }

    /// 维护统计（全部设备）
    pub fn maintenance_statistics(&self) -> MaintenanceStatistics {
        maintenance_statistics(&self.all(), self.now)
    }

    /// 综合报告（全部设备）
    pub fn comprehensive(&self) -> ComprehensiveSummary {
        comprehensive_summary(&self.all(), self.now)
    }

    /// 中心报告；中心可以是名称或代码
    pub fn center_report(&self, center: &str) -> AppResult<(CenterSummary, Vec<&'a DeviceRecord>)> {
        let center = resolve_center(center)
            .ok_or_else(|| AppError::validation_error(format!("未知的中心: '{}'", center.trim())))?;
        let records: Vec<&DeviceRecord> = self
            .dataset
            .records
            .iter()
            .filter(|r| r.center_code() == center.code)
            .collect();
        Ok((center_summary(center.name, &records, self.now), records))
    }

    /// 自定义报告
    pub fn custom(&self, filter: &DeviceFilter) -> (Vec<DeviceRow>, Vec<&'a DeviceRecord>) {
        let records = filter.apply(&self.dataset.records);
        (self.rows(&records), records)
    }

    /// 全部记录（综合报告导出用）
    pub fn all_records(&self) -> Vec<&'a DeviceRecord> {
        self.all()
    }

    /// 导出报告到目录，返回文件路径
    pub fn export(&self, kind: &ReportKind, records: &[&DeviceRecord], dir: &Path) -> AppResult<PathBuf> {
        let bytes = ExcelWriter::export_report(records, &self.dataset.extra_headers, self.now)?;
        let path = dir.join(kind.file_name(self.now));
        ExcelWriter::write_atomically(&path, &bytes)?;
        log::info!("报告已导出: {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeviceStatus, Priority, ScheduleWindow};
    use crate::utils::time_utils::start_of_day;
    use chrono::{Duration, NaiveDate};
    use tempfile::TempDir;

    fn now() -> NaiveDateTime {
        start_of_day(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    fn dataset() -> DeviceDataset {
        let today = now().date();
        let mut pump = DeviceRecord::new("KHL-PHC-001", "ICU", "Infusion Pump");
        pump.next_maintenance = Some(today - Duration::days(3));
        pump.priority = Priority::High;
        let mut monitor = DeviceRecord::new("MHL-PHC-001", "ICU", "Monitor");
        monitor.next_maintenance = Some(today + Duration::days(40));
        monitor.device_status = DeviceStatus::Broken;
        let mut xray = DeviceRecord::new("MHL-PHC-002", "Radiology", "X-Ray");
        xray.serial_no = "PUMP-LIKE-9".to_string();
        DeviceDataset::new(vec![pump, monitor, xray])
    }

    #[test]
    fn test_file_names() {
        assert_eq!(ReportKind::Comprehensive.file_name(now()), "comprehensive_report_20240601.xlsx");
        assert_eq!(ReportKind::Center("المحلة".to_string()).file_name(now()), "report_المحلة_20240601.xlsx");
        assert_eq!(ReportKind::Schedule.file_name(now()), "maintenance_schedule_20240601.xlsx");
    }

    #[test]
    fn test_search_and_center_filter() {
        let data = dataset();
        let service = ReportService::new(&data, now());
        let found: Vec<String> = service.search("pump", None).into_iter().map(|r| r.asset_id).collect();
        assert_eq!(found, vec!["KHL-PHC-001", "MHL-PHC-002"]);
        assert_eq!(service.search("pump", Some("المحلة")).len(), 1);
        assert_eq!(service.search("", None).len(), 3);
    }

    #[test]
    fn test_center_report() {
        let data = dataset();
        let service = ReportService::new(&data, now());
        let (summary, records) = service.center_report("MHL-PHC").unwrap();
        assert_eq!(summary.center_name, "المحلة");
        assert_eq!(summary.total, 2);
        assert_eq!(summary.broken, 1);
        assert_eq!(records.len(), 2);
        assert!(service.center_report("Atlantis").is_err());
    }

    #[test]
    fn test_dashboard_default_filter_and_schedule() {
        let data = dataset();
        let service = ReportService::new(&data, now());
        let summary = service.dashboard(&DeviceFilter::dashboard_default());
        assert_eq!(summary.total, 2);
        assert_eq!(summary.overdue, 1);

        let rows = service.schedule(&ScheduleQuery::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].days_until, -3);

        let query = ScheduleQuery { window: ScheduleWindow::All, priorities: vec![], center: None };
        assert_eq!(service.schedule_records(&query).len(), 2);
    }

    #[test]
    fn test_export_writes_dated_file() {
        let dir = TempDir::new().unwrap();
        let data = dataset();
        let service = ReportService::new(&data, now());
        let (_, records) = service.custom(&DeviceFilter {
            departments: vec!["ICU".to_string()],
            ..Default::default()
        });
        let path = service.export(&ReportKind::Custom, &records, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("custom_report_20240601.xlsx"));
        assert!(path.exists());
    }
}
