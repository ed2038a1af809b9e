//! # 模型枚举类型模块
//!
//! ## 业务作用
//! - **设备运行状态**: 设备本身是否可用（与维护排程无关）
//! - **优先级**: 设备维护优先级
//! - **维护状态**: 由下次维护日期推导出的紧急程度
//! - **维护类型**: 登记维护记录时选择的作业类型
//! - **排程时间窗**: 维护计划视图的筛选窗口
//!
//! ## 标签约定
//! 台账文件中以阿拉伯文标签存储枚举值。解析时同时接受阿拉伯文标签和英文变体名
//! （不区分大小写，忽略空格与下划线），写回文件时统一输出阿拉伯文标签。

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// 归一化英文输入：小写并去掉空格、下划线、连字符
fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// 设备运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeviceStatus {
    /// 正常工作
    Working,
    /// 故障
    Broken,
    /// 维修中
    UnderMaintenance,
}

impl Default for DeviceStatus {
    fn default() -> Self {
        Self::Working
    }
}

impl DeviceStatus {
    /// 全部状态（界面下拉顺序）
    pub const ALL: [DeviceStatus; 3] = [Self::Working, Self::Broken, Self::UnderMaintenance];

    /// 台账文件中的标签
    pub fn label(&self) -> &'static str {
        match self {
            DeviceStatus::Working => "عامل",
            DeviceStatus::Broken => "معطل",
            DeviceStatus::UnderMaintenance => "تحت الصيانة",
        }
    }
}

impl Display for DeviceStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for DeviceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(status) = Self::ALL.iter().find(|v| v.label() == trimmed) {
            return Ok(*status);
        }
        match normalize(trimmed).as_str() {
            "working" => Ok(DeviceStatus::Working),
            "broken" => Ok(DeviceStatus::Broken),
            "undermaintenance" => Ok(DeviceStatus::UnderMaintenance),
            _ => Err(format!("Invalid DeviceStatus: {}", s)),
        }
    }
}

/// 维护优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl Priority {
    pub const ALL: [Priority; 3] = [Self::High, Self::Medium, Self::Low];

    /// 台账文件中的标签
    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "عالي",
            Priority::Medium => "متوسط",
            Priority::Low => "منخفض",
        }
    }

    /// 排序权重，数值越小越靠前
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(priority) = Self::ALL.iter().find(|v| v.label() == trimmed) {
            return Ok(*priority);
        }
        match normalize(trimmed).as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(format!("Invalid Priority: {}", s)),
        }
    }
}

/// 维护状态（由下次维护日期推导）
///
/// 每条设备记录恰好对应其中一种
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MaintenanceStatus {
    /// 未设置下次维护日期
    Undetermined,
    /// 已逾期
    Overdue,
    /// 7天内到期
    Urgent,
    /// 30天内到期
    Upcoming,
    /// 30天以后
    Good,
}

impl MaintenanceStatus {
    pub const ALL: [MaintenanceStatus; 5] = [
        Self::Undetermined,
        Self::Overdue,
        Self::Urgent,
        Self::Upcoming,
        Self::Good,
    ];

    /// 报告中 `Maintenance_Status` 列的标签
    pub fn label(&self) -> &'static str {
        match self {
            MaintenanceStatus::Undetermined => "غير محدد",
            MaintenanceStatus::Overdue => "متأخر",
            MaintenanceStatus::Urgent => "عاجل",
            MaintenanceStatus::Upcoming => "قريب",
            MaintenanceStatus::Good => "جيد",
        }
    }

    /// 状态图标
    pub fn icon(&self) -> &'static str {
        match self {
            MaintenanceStatus::Undetermined => "⚪",
            MaintenanceStatus::Overdue => "🔴",
            MaintenanceStatus::Urgent => "🟠",
            MaintenanceStatus::Upcoming => "🟡",
            MaintenanceStatus::Good => "🟢",
        }
    }

    /// 图表颜色
    pub fn color_hex(&self) -> &'static str {
        match self {
            MaintenanceStatus::Undetermined => "#9e9e9e",
            MaintenanceStatus::Overdue => "#ff4b4b",
            MaintenanceStatus::Urgent => "#ffa500",
            MaintenanceStatus::Upcoming => "#ffeb3b",
            MaintenanceStatus::Good => "#4caf50",
        }
    }

    /// 是否需要立即关注
    pub fn needs_attention(&self) -> bool {
        matches!(self, MaintenanceStatus::Overdue | MaintenanceStatus::Urgent)
    }
}

impl Display for MaintenanceStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for MaintenanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(status) = Self::ALL.iter().find(|v| v.label() == trimmed) {
            return Ok(*status);
        }
        match normalize(trimmed).as_str() {
            "undetermined" => Ok(MaintenanceStatus::Undetermined),
            "overdue" => Ok(MaintenanceStatus::Overdue),
            "urgent" => Ok(MaintenanceStatus::Urgent),
            "upcoming" => Ok(MaintenanceStatus::Upcoming),
            "good" => Ok(MaintenanceStatus::Good),
            _ => Err(format!("Invalid MaintenanceStatus: {}", s)),
        }
    }
}

/// 维护作业类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaintenanceType {
    /// 定期保养
    Periodic,
    /// 紧急维修
    Emergency,
    /// 校准
    Calibration,
    /// 故障修复
    Repair,
    /// 更换部件
    PartsReplacement,
}

impl Default for MaintenanceType {
    fn default() -> Self {
        Self::Periodic
    }
}

impl MaintenanceType {
    pub const ALL: [MaintenanceType; 5] = [
        Self::Periodic,
        Self::Emergency,
        Self::Calibration,
        Self::Repair,
        Self::PartsReplacement,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MaintenanceType::Periodic => "صيانة دورية",
            MaintenanceType::Emergency => "صيانة طارئة",
            MaintenanceType::Calibration => "معايرة",
            MaintenanceType::Repair => "إصلاح عطل",
            MaintenanceType::PartsReplacement => "استبدال قطع",
        }
    }
}

impl Display for MaintenanceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for MaintenanceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(kind) = Self::ALL.iter().find(|v| v.label() == trimmed) {
            return Ok(*kind);
        }
        match normalize(trimmed).as_str() {
            "periodic" => Ok(MaintenanceType::Periodic),
            "emergency" => Ok(MaintenanceType::Emergency),
            "calibration" => Ok(MaintenanceType::Calibration),
            "repair" => Ok(MaintenanceType::Repair),
            "partsreplacement" | "parts" => Ok(MaintenanceType::PartsReplacement),
            _ => Err(format!("Invalid MaintenanceType: {}", s)),
        }
    }
}

/// 维护计划时间窗
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleWindow {
    /// 已逾期
    Overdue,
    /// 7天内
    Week,
    /// 30天内
    Month,
    /// 90天内
    Quarter,
    /// 全部已排程设备
    All,
}

impl Default for ScheduleWindow {
    fn default() -> Self {
        Self::Overdue
    }
}

impl ScheduleWindow {
    /// 窗口上限天数（逾期与全部没有上限）
    pub fn horizon_days(&self) -> Option<i64> {
        match self {
            ScheduleWindow::Week => Some(7),
            ScheduleWindow::Month => Some(30),
            ScheduleWindow::Quarter => Some(90),
            ScheduleWindow::Overdue | ScheduleWindow::All => None,
        }
    }
}

impl FromStr for ScheduleWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "overdue" => Ok(ScheduleWindow::Overdue),
            "week" => Ok(ScheduleWindow::Week),
            "month" => Ok(ScheduleWindow::Month),
            "quarter" | "3months" => Ok(ScheduleWindow::Quarter),
            "all" => Ok(ScheduleWindow::All),
            _ => Err(format!("Invalid ScheduleWindow: {}", s)),
        }
    }
}
