/// Excel台账导入服务
///
/// 负责把设备台账（第一个工作表，首行为表头）解析为 [`DeviceDataset`]。
/// 列按表头名称定位，与列顺序无关；缺省值在这里一次性填充。
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use calamine::{open_workbook, DataType, Range, Reader, Xlsx};
use chrono::NaiveDate;
use log::{debug, info};

use crate::log_file_parsing_failure;
use crate::models::structs::columns;
use crate::models::{DeviceDataset, DeviceRecord, DeviceStatus, Priority, DEFAULT_INTERVAL_DAYS};
use crate::utils::error::{AppError, AppResult};
use crate::utils::time_utils::parse_date;

/// 表头索引：列名 → 列号
struct HeaderIndex {
    positions: HashMap<String, usize>,
    /// 未建模的列（列号, 列名），保持原始顺序
    extra: Vec<(usize, String)>,
}

impl HeaderIndex {
    fn from_row(row: &[DataType]) -> AppResult<Self> {
        let mut positions = HashMap::new();
        let mut extra = Vec::new();
        for (idx, cell) in row.iter().enumerate() {
            let name = cell_text(cell);
            if name.is_empty() || positions.contains_key(&name) {
                continue;
            }
            let modeled = columns::MODELED.contains(&name.as_str());
            let derived = columns::DERIVED.contains(&name.as_str());
            if !modeled && !derived {
                extra.push((idx, name.clone()));
            }
            positions.insert(name, idx);
        }

        let missing: Vec<&str> = columns::REQUIRED
            .iter()
            .copied()
            .filter(|name| !positions.contains_key(*name))
            .collect();
        if !missing.is_empty() {
            return Err(AppError::validation_error(format!(
                "台账缺少必需列: {}",
                missing.join(", ")
            )));
        }

        Ok(Self { positions, extra })
    }

    fn cell<'a>(&self, row: &'a [DataType], column: &str) -> Option<&'a DataType> {
        self.positions.get(column).and_then(|idx| row.get(*idx))
    }

    fn text(&self, row: &[DataType], column: &str) -> String {
        self.cell(row, column).map(cell_text).unwrap_or_default()
    }
}

/// Excel导入器
pub struct ExcelImporter;

impl ExcelImporter {
    /// 加载台账文件
    ///
    /// 缺少必需列或文件无法读取时返回错误；单元格级别的问题只记录日志并取缺省值。
    pub fn load_dataset(file_path: &Path) -> AppResult<DeviceDataset> {
        info!("开始加载设备台账: {}", file_path.display());

        if !file_path.exists() {
            return Err(AppError::validation_error(format!(
                "文件不存在: {}",
                file_path.display()
            )));
        }

        let mut workbook: Xlsx<_> = open_workbook(file_path)
            .map_err(|e| AppError::excel_error(format!("无法打开Excel文件: {}", e)))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| AppError::validation_error("Excel文件中没有工作表"))?;

        let range = match workbook.worksheet_range(&sheet_name) {
            Some(Ok(range)) => range,
            Some(Err(e)) => return Err(AppError::excel_error(format!("无法读取工作表: {}", e))),
            None => return Err(AppError::validation_error(format!("工作表不存在: {}", sheet_name))),
        };

        let dataset = Self::parse_range(&range)?;
        info!("台账加载完成，共 {} 台设备", dataset.len());
        Ok(dataset)
    }

    /// 解析工作表数据
    pub fn parse_range(range: &Range<DataType>) -> AppResult<DeviceDataset> {
        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| AppError::validation_error("台账为空，缺少表头行"))?;
        let header = HeaderIndex::from_row(header_row)?;

        let mut records = Vec::new();
        for (offset, row) in rows.enumerate() {
            // Excel中的实际行号（表头为第1行）
            let row_number = offset + 2;
            if row.iter().all(|cell| cell_text(cell).is_empty()) {
                continue;
            }
            match Self::parse_data_row(&header, row, row_number) {
                Some(record) => records.push(record),
                None => {
                    log_file_parsing_failure!("第{}行缺少资产编号，已跳过", row_number);
                }
            }
        }

        Ok(DeviceDataset {
            records,
            extra_headers: header.extra.iter().map(|(_, name)| name.clone()).collect(),
        })
    }

    /// 解析数据行；没有资产编号时返回 None
    fn parse_data_row(header: &HeaderIndex, row: &[DataType], row_number: usize) -> Option<DeviceRecord> {
        let asset_id = header.text(row, columns::ASSET_ID);
        if asset_id.is_empty() {
            return None;
        }

        let mut record = DeviceRecord::new(
            asset_id,
            header.text(row, columns::DEPARTMENT),
            header.text(row, columns::EQUIPMENT_NAME),
        );
        record.manufacturer = header.text(row, columns::MANUFACTURER);
        record.model = header.text(row, columns::MODEL);
        record.serial_no = header.text(row, columns::SERIAL_NO);
        record.notes = header.text(row, columns::NOTES);

        record.installation_date = Self::date_value(header, row, columns::INSTALLATION_DATE, row_number);
        record.last_maintenance = Self::date_value(header, row, columns::LAST_MAINTENANCE, row_number);
        record.next_maintenance = Self::date_value(header, row, columns::NEXT_MAINTENANCE, row_number);
        record.maintenance_interval_days = Self::interval_value(header, row, row_number);
        record.device_status = Self::label_value::<DeviceStatus>(header, row, columns::DEVICE_STATUS, row_number);
        record.priority = Self::label_value::<Priority>(header, row, columns::PRIORITY, row_number);

        for (idx, name) in &header.extra {
            let value = row.get(*idx).map(cell_text).unwrap_or_default();
            if !value.is_empty() {
                record.extra_columns.insert(name.clone(), value);
            }
        }

        debug!("第{}行解析成功: {}", row_number, record.asset_id);
        Some(record)
    }

    /// 日期列；无法解析的值视为空
    fn date_value(header: &HeaderIndex, row: &[DataType], column: &str, row_number: usize) -> Option<NaiveDate> {
        let cell = header.cell(row, column)?;
        let parsed = cell_date(cell);
        if parsed.is_none() && !cell_text(cell).is_empty() {
            log_file_parsing_failure!(
                "第{}行'{}'列日期无法解析: '{}'，按空值处理",
                row_number,
                column,
                cell_text(cell)
            );
        }
        parsed
    }

    /// 维护周期列；空值、非正数或非整数取默认周期
    fn interval_value(header: &HeaderIndex, row: &[DataType], row_number: usize) -> u32 {
        let Some(cell) = header.cell(row, columns::INTERVAL_DAYS) else {
            return DEFAULT_INTERVAL_DAYS;
        };
        let number = match cell {
            DataType::Int(v) => Some(*v as f64),
            DataType::Float(v) => Some(*v),
            DataType::Empty => return DEFAULT_INTERVAL_DAYS,
            other => {
                let text = cell_text(other);
                if text.is_empty() {
                    return DEFAULT_INTERVAL_DAYS;
                }
                text.parse::<f64>().ok()
            }
        };

        match number {
            Some(v) if v >= 1.0 && v.fract() == 0.0 && v <= f64::from(u32::MAX) => v as u32,
            _ => {
                log_file_parsing_failure!(
                    "第{}行维护周期'{}'无效，使用默认值{}天",
                    row_number,
                    cell_text(cell),
                    DEFAULT_INTERVAL_DAYS
                );
                DEFAULT_INTERVAL_DAYS
            }
        }
    }

    /// 标签列（设备状态、优先级）；无法识别时取默认值
    fn label_value<T>(header: &HeaderIndex, row: &[DataType], column: &str, row_number: usize) -> T
    where
        T: FromStr<Err = String> + Default,
    {
        let text = header.text(row, column);
        if text.is_empty() {
            return T::default();
        }
        T::from_str(&text).unwrap_or_else(|e| {
            log_file_parsing_failure!("第{}行'{}'列取值无法识别({})，使用默认值", row_number, column, e);
            T::default()
        })
    }
}

/// 单元格文本；日期单元格格式化为 `YYYY-MM-DD`
fn cell_text(cell: &DataType) -> String {
    match cell {
        DataType::Empty => String::new(),
        DataType::DateTime(_) => cell
            .as_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| cell.to_string()),
        _ => cell.to_string().trim().to_string(),
    }
}

/// 单元格日期：日期单元格、Excel序列号或日期字符串
fn cell_date(cell: &DataType) -> Option<NaiveDate> {
    match cell {
        DataType::Empty => None,
        DataType::String(s) | DataType::DateTimeIso(s) => parse_date(s),
        _ => cell.as_date(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use tempfile::TempDir;

    fn write_sheet(dir: &TempDir, name: &str, rows: &[Vec<&str>]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    sheet.write_string(r as u32, c as u16, *value).unwrap();
                }
            }
        }
        workbook.save(&path).unwrap();
        path
    }

    fn required_header() -> Vec<&'static str> {
        columns::REQUIRED.to_vec()
    }

    #[test]
    fn test_missing_required_column_fails() {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = TempDir::new().unwrap();
        let header: Vec<&str> = columns::REQUIRED.iter().copied().filter(|c| *c != columns::SERIAL_NO).collect();
        let path = write_sheet(&dir, "bad.xlsx", &[header]);

        let err = ExcelImporter::load_dataset(&path).unwrap_err();
        assert!(err.to_string().contains(columns::SERIAL_NO));
    }

    #[test]
    fn test_optional_columns_defaulted() {
        let dir = TempDir::new().unwrap();
        let path = write_sheet(
            &dir,
            "minimal.xlsx",
            &[
                required_header(),
                vec!["KHL-PHC-001", "Lab", "Centrifuge", "Hettich", "EBA 200", "SN1", "2023-01-15"],
            ],
        );

        let dataset = ExcelImporter::load_dataset(&path).unwrap();
        assert_eq!(dataset.len(), 1);
        let record = &dataset.records[0];
        assert_eq!(record.maintenance_interval_days, DEFAULT_INTERVAL_DAYS);
        assert_eq!(record.device_status, DeviceStatus::Working);
        assert_eq!(record.priority, Priority::Medium);
        assert_eq!(record.installation_date, NaiveDate::from_ymd_opt(2023, 1, 15));
        assert_eq!(record.next_maintenance, None);
        assert!(record.notes.is_empty());
        assert!(dataset.extra_headers.is_empty());
    }

    #[test]
    fn test_bad_values_coerced_and_rows_without_id_skipped() {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = TempDir::new().unwrap();
        let mut header = required_header();
        header.extend([
            columns::NEXT_MAINTENANCE,
            columns::INTERVAL_DAYS,
            columns::DEVICE_STATUS,
            columns::PRIORITY,
            columns::MAINTENANCE_STATUS,
            "PPM Done",
        ]);
        let path = write_sheet(
            &dir,
            "messy.xlsx",
            &[
                header,
                vec!["KHL-PHC-001", "Lab", "Centrifuge", "", "", "", "not a date", "2024-07-01", "abc", "معطل", "High", "🟢 جيد", "Yes"],
                vec!["", "Lab", "Orphan", "", "", "", "", "", "", "", "", "", ""],
                vec!["MHL-PHC-002", "ICU", "Monitor", "", "", "", "", "31/12/2024", "0", "Unknown", "عالي", "", ""],
            ],
        );

        let dataset = ExcelImporter::load_dataset(&path).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.extra_headers, vec!["PPM Done".to_string()]);

        let first = &dataset.records[0];
        assert_eq!(first.installation_date, None);
        assert_eq!(first.next_maintenance, NaiveDate::from_ymd_opt(2024, 7, 1));
        assert_eq!(first.maintenance_interval_days, DEFAULT_INTERVAL_DAYS);
        assert_eq!(first.device_status, DeviceStatus::Broken);
        assert_eq!(first.priority, Priority::High);
        assert_eq!(first.extra_columns.get("PPM Done").map(String::as_str), Some("Yes"));
        assert!(!first.extra_columns.contains_key(columns::MAINTENANCE_STATUS));

        let second = &dataset.records[1];
        assert_eq!(second.next_maintenance, NaiveDate::from_ymd_opt(2024, 12, 31));
        assert_eq!(second.maintenance_interval_days, DEFAULT_INTERVAL_DAYS);
        assert_eq!(second.device_status, DeviceStatus::Working);
        assert_eq!(second.priority, Priority::High);
    }

    #[test]
    fn test_numeric_and_date_cells() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("typed.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let mut header = required_header();
        header.push(columns::INTERVAL_DAYS);
        for (c, name) in header.iter().enumerate() {
            sheet.write_string(0, c as u16, *name).unwrap();
        }
        let date_fmt = rust_xlsxwriter::Format::new().set_num_format("yyyy-mm-dd");
        let installed = NaiveDate::from_ymd_opt(2022, 3, 10).unwrap();
        sheet.write_string(1, 0, "SAD-PHC-007").unwrap();
        sheet.write_string(1, 1, "Dental").unwrap();
        sheet.write_string(1, 2, "Dental Chair").unwrap();
        sheet.write_number(1, 5, 123456.0).unwrap();
        sheet.write_datetime_with_format(1, 6, &installed, &date_fmt).unwrap();
        sheet.write_number(1, 7, 180.0).unwrap();
        workbook.save(&path).unwrap();

        let dataset = ExcelImporter::load_dataset(&path).unwrap();
        let record = &dataset.records[0];
        assert_eq!(record.serial_no, "123456");
        assert_eq!(record.installation_date, Some(installed));
        assert_eq!(record.maintenance_interval_days, 180);
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(ExcelImporter::load_dataset(&dir.path().join("none.xlsx")).is_err());
    }
}
