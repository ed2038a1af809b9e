//! 卫生中心静态参照表
//!
//! 25个中心，名称与代码双向查询：新增设备时按名称取代码分配资产编号，
//! 展示时按资产编号前缀取中心名称。

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// 卫生中心
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Center {
    pub name: &'static str,
    pub code: &'static str,
}

const fn center(name: &'static str, code: &'static str) -> Center {
    Center { name, code }
}

/// 全部卫生中心
pub static CENTERS: [Center; 25] = [
    center("الخلاوية", "KHL-PHC"),
    center("جبل القهر", "GQH-PHC"),
    center("مقزع", "MQZ-PHC"),
    center("القوام", "QWM-PHC"),
    center("الجبل الأسود", "BLM-PHC"),
    center("السادة", "SAD-PHC"),
    center("بيش الشمالي", "NBS-PHC"),
    center("قرية بيش", "VBS-PHC"),
    center("المحلة", "MHL-PHC"),
    center("العشة", "ASH-PHC"),
    center("أبو السداد", "ASD-PHC"),
    center("العالية", "ALA-PHC"),
    center("السلامة", "SAL-PHC"),
    center("مسلية", "MSL-PHC"),
    center("عتود", "ATD-PHC"),
    center("الفطيحة", "FTH-PHC"),
    center("منشبة", "MNS-PHC"),
    center("قايم الدش", "QDS-PHC"),
    center("المطعن", "MTN-PHC"),
    center("الحقو", "HAQ-PHC"),
    center("الريث", "RYT-PHC"),
    center("الشقيق", "SHQ-PHC"),
    center("الدرب", "DRB-PHC"),
    center("بيش الجنوبي", "SBS-PHC"),
    center("عمود", "AMD-PHC"),
];

static BY_CODE: Lazy<HashMap<&'static str, &'static Center>> =
    Lazy::new(|| CENTERS.iter().map(|c| (c.code, c)).collect());

static BY_NAME: Lazy<HashMap<&'static str, &'static Center>> =
    Lazy::new(|| CENTERS.iter().map(|c| (c.name, c)).collect());

/// 按代码查中心名称
pub fn center_name_for_code(code: &str) -> Option<&'static str> {
    BY_CODE.get(code).map(|c| c.name)
}

/// 按名称查中心代码
pub fn center_code_for_name(name: &str) -> Option<&'static str> {
    BY_NAME.get(name.trim()).map(|c| c.code)
}

/// 按名称或代码（代码不区分大小写）解析中心
pub fn resolve_center(input: &str) -> Option<&'static Center> {
    let input = input.trim();
    BY_NAME
        .get(input)
        .or_else(|| BY_CODE.get(input.to_uppercase().as_str()))
        .copied()
}

/// 资产编号中的中心代码部分（前两段，如 `KHL-PHC-001` → `KHL-PHC`）
pub fn center_code_of(asset_id: &str) -> String {
    asset_id.trim().splitn(3, '-').take(2).collect::<Vec<_>>().join("-")
}
