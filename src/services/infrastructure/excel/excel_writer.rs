/// Excel台账写出服务
///
/// - 保存台账：建模列按规范顺序写出，其后是原文件中的未建模列；不写派生列
/// - 导出报告：在台账列之后追加中心代码、中心名称、维护状态三列，表头带样式
use std::io::Write;
use std::path::Path;
use chrono::NaiveDateTime;
use log::info;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};
use tempfile::NamedTempFile;

use crate::domain::maintenance_evaluator::evaluate;
use crate::log_persistence_failure;
use crate::models::structs::columns;
use crate::models::DeviceRecord;
use crate::utils::error::{AppError, AppResult};

/// 报告工作表名称
pub const REPORT_SHEET_NAME: &str = "تقرير الصيانة";
/// 报告列宽
pub const REPORT_COLUMN_WIDTH: f64 = 20.0;
/// 报告表头背景色 (#4CAF50)
const HEADER_BACKGROUND: u32 = 0x4CAF50;
const DATE_FORMAT: &str = "yyyy-mm-dd";

/// Excel写出器
pub struct ExcelWriter;

impl ExcelWriter {
    /// 原子保存台账：先写同目录临时文件再替换，失败时原文件保持不变
    pub fn save_dataset(file_path: &Path, records: &[DeviceRecord], extra_headers: &[String]) -> AppResult<()> {
        let buffer = Self::dataset_workbook(records, extra_headers)
            .map_err(|e| AppError::excel_error(format!("生成台账失败: {}", e)))?;

        Self::write_atomically(file_path, &buffer).map_err(|e| {
            log_persistence_failure!("保存台账 {} 失败: {}", file_path.display(), e);
            e
        })?;

        info!("台账已保存到 {}，共 {} 台设备", file_path.display(), records.len());
        Ok(())
    }

    /// 生成报告工作簿（内存中的 xlsx 字节）
    pub fn export_report(records: &[&DeviceRecord], extra_headers: &[String], now: NaiveDateTime) -> AppResult<Vec<u8>> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(REPORT_SHEET_NAME)?;

        let header_fmt = Format::new()
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(HEADER_BACKGROUND))
            .set_align(FormatAlign::Center)
            .set_border(FormatBorder::Thin);

        let headers = report_headers(extra_headers);
        for (col, title) in headers.iter().enumerate() {
            sheet.write_with_format(0, col as u16, title.as_str(), &header_fmt)?;
            sheet.set_column_width(col as u16, REPORT_COLUMN_WIDTH)?;
        }

        let date_fmt = Format::new().set_num_format(DATE_FORMAT);
        let derived_start = (columns::MODELED.len() + extra_headers.len()) as u16;
        for (idx, record) in records.iter().enumerate() {
            let row = (idx + 1) as u32;
            write_record(sheet, row, record, extra_headers, &date_fmt)?;
            sheet.write_string(row, derived_start, record.center_code())?;
            sheet.write_string(row, derived_start + 1, record.center_name().unwrap_or_default())?;
            sheet.write_string(row, derived_start + 2, evaluate(record, now).status.label())?;
        }

        let buffer = workbook
            .save_to_buffer()
            .map_err(|e| AppError::report_generation_error(format!("生成报告失败: {}", e)))?;
        info!("报告已生成，共 {} 行", records.len());
        Ok(buffer)
    }

    /// 把字节写到目标路径（同目录临时文件 + 重命名）
    pub fn write_atomically(file_path: &Path, bytes: &[u8]) -> AppResult<()> {
        let dir = match file_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => std::path::PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut temp_file = NamedTempFile::new_in(&dir)?;
        temp_file.write_all(bytes)?;
        temp_file.flush()?;
        temp_file.persist(file_path)?;
        Ok(())
    }

    fn dataset_workbook(records: &[DeviceRecord], extra_headers: &[String]) -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();

        let mut col = 0u16;
        for title in columns::MODELED.iter().copied().chain(extra_headers.iter().map(String::as_str)) {
            sheet.write_string(0, col, title)?;
            col += 1;
        }

        let date_fmt = Format::new().set_num_format(DATE_FORMAT);
        for (idx, record) in records.iter().enumerate() {
            write_record(sheet, (idx + 1) as u32, record, extra_headers, &date_fmt)?;
        }

        workbook.save_to_buffer()
    }
}

/// 报告列：台账列 + 派生列
pub fn report_headers(extra_headers: &[String]) -> Vec<String> {
    columns::MODELED
        .iter()
        .map(|c| c.to_string())
        .chain(extra_headers.iter().cloned())
        .chain(columns::DERIVED.iter().map(|c| c.to_string()))
        .collect()
}

/// 写出一条记录的台账列（建模列 + 未建模列）
fn write_record(
    sheet: &mut Worksheet,
    row: u32,
    record: &DeviceRecord,
    extra_headers: &[String],
    date_fmt: &Format,
) -> Result<(), XlsxError> {
    sheet.write_string(row, 0, &record.asset_id)?;
    sheet.write_string(row, 1, &record.department)?;
    sheet.write_string(row, 2, &record.equipment_name)?;
    sheet.write_string(row, 3, &record.manufacturer)?;
    sheet.write_string(row, 4, &record.model)?;
    sheet.write_string(row, 5, &record.serial_no)?;
    for (col, date) in [
        (6u16, record.installation_date),
        (7, record.last_maintenance),
        (8, record.next_maintenance),
    ] {
        if let Some(date) = date {
            sheet.write_datetime_with_format(row, col, &date, date_fmt)?;
        }
    }
    sheet.write_number(row, 9, f64::from(record.maintenance_interval_days))?;
    sheet.write_string(row, 10, record.device_status.label())?;
    sheet.write_string(row, 11, record.priority.label())?;
    sheet.write_string(row, 12, &record.notes)?;

    let base = columns::MODELED.len() as u16;
    for (offset, name) in extra_headers.iter().enumerate() {
        if let Some(value) = record.extra_columns.get(name) {
            sheet.write_string(row, base + offset as u16, value)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeviceStatus, MaintenanceStatus, Priority};
    use crate::services::infrastructure::excel::ExcelImporter;
    use crate::utils::time_utils::start_of_day;
    use calamine::{Reader, Xlsx};
    use chrono::NaiveDate;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn sample_records() -> Vec<DeviceRecord> {
        let mut first = DeviceRecord::new("KHL-PHC-001", "Emergency", "Defibrillator");
        first.manufacturer = "Philips".to_string();
        first.serial_no = "DF-1".to_string();
        first.installation_date = NaiveDate::from_ymd_opt(2022, 1, 10);
        first.last_maintenance = NaiveDate::from_ymd_opt(2024, 3, 1);
        first.next_maintenance = NaiveDate::from_ymd_opt(2024, 5, 30);
        first.device_status = DeviceStatus::UnderMaintenance;
        first.priority = Priority::High;
        first.notes = "[2024-03-01] صيانة دورية - Ali: ok".to_string();
        first.extra_columns.insert("PPM Done".to_string(), "Yes".to_string());

        let second = DeviceRecord::new("ZZZ-PHC-001", "Lab", "Centrifuge");
        vec![first, second]
    }

    #[test]
    fn test_save_then_load_preserves_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("devices.xlsx");
        let records = sample_records();
        let extra = vec!["PPM Done".to_string()];

        ExcelWriter::save_dataset(&path, &records, &extra).unwrap();
        let dataset = ExcelImporter::load_dataset(&path).unwrap();

        assert_eq!(dataset.records, records);
        assert_eq!(dataset.extra_headers, extra);
    }

    #[test]
    fn test_saved_file_has_no_derived_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("devices.xlsx");
        ExcelWriter::save_dataset(&path, &sample_records(), &[]).unwrap();

        let mut workbook: Xlsx<_> = calamine::open_workbook(&path).unwrap();
        let range = workbook.worksheet_range("Sheet1").unwrap().unwrap();
        let header: Vec<String> = range.rows().next().unwrap().iter().map(|c| c.to_string()).collect();
        assert_eq!(header, columns::MODELED.iter().map(|c| c.to_string()).collect::<Vec<_>>());
    }

    #[test]
    fn test_failed_save_leaves_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("devices.xlsx");
        ExcelWriter::save_dataset(&path, &sample_records(), &[]).unwrap();
        let before = std::fs::read(&path).unwrap();

        // 目标是目录，重命名必然失败
        let blocked = dir.path().join("blocked");
        std::fs::create_dir_all(blocked.join("inner")).unwrap();
        assert!(ExcelWriter::save_dataset(&blocked, &sample_records(), &[]).is_err());
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_report_has_derived_columns() {
        let records = sample_records();
        let refs: Vec<&DeviceRecord> = records.iter().collect();
        let now = start_of_day(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        let bytes = ExcelWriter::export_report(&refs, &["PPM Done".to_string()], now).unwrap();

        let mut workbook = Xlsx::new(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names().to_vec(), vec![REPORT_SHEET_NAME.to_string()]);
        let range = workbook.worksheet_range(REPORT_SHEET_NAME).unwrap().unwrap();
        let rows: Vec<Vec<String>> = range
            .rows()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect();

        let header = &rows[0];
        assert_eq!(header.len(), columns::MODELED.len() + 1 + columns::DERIVED.len());
        assert_eq!(&header[header.len() - 3..], &["Center_Code", "Center_Name", "Maintenance_Status"]);
        assert_eq!(rows[1][header.len() - 3], "KHL-PHC");
        assert_eq!(rows[1][header.len() - 2], "الخلاوية");
        assert_eq!(rows[1][header.len() - 1], MaintenanceStatus::Overdue.label());
        assert_eq!(rows[2][header.len() - 2], "");
        assert_eq!(rows[2][header.len() - 1], MaintenanceStatus::Undetermined.label());
    }
}
