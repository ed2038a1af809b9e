//! 维护状态评估器
//!
//! 给定设备记录和参考时刻，得出维护状态与剩余天数；以及维护/安装后的下次到期日推导。
//! 全部为纯函数，不修改记录，每条记录 O(1)。

use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::{DeviceRecord, MaintenanceStatus};
use crate::utils::error::{AppError, AppResult};
use crate::utils::time_utils::{floor_days_between, start_of_day};

/// 剩余天数不超过该值视为紧急
pub const URGENT_THRESHOLD_DAYS: i64 = 7;
/// 剩余天数不超过该值视为即将到期
pub const UPCOMING_THRESHOLD_DAYS: i64 = 30;

/// 评估结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MaintenanceAssessment {
    pub status: MaintenanceStatus,
    /// 距下次维护的整天数（可为负）；未排程时为空
    pub days_until: Option<i64>,
}

/// 按剩余天数分类，阈值对全部整数构成划分
pub fn classify_days(days_until: i64) -> MaintenanceStatus {
    if days_until < 0 {
        MaintenanceStatus::Overdue
    } else if days_until <= URGENT_THRESHOLD_DAYS {
        MaintenanceStatus::Urgent
    } else if days_until <= UPCOMING_THRESHOLD_DAYS {
        MaintenanceStatus::Upcoming
    } else {
        MaintenanceStatus::Good
    }
}

/// 距下次维护的整天数，下次维护日期按当天零点计算
pub fn days_until_due(record: &DeviceRecord, now: NaiveDateTime) -> Option<i64> {
    record
        .next_maintenance
        .map(|next| floor_days_between(now, start_of_day(next)))
}

/// 评估设备的维护状态
pub fn evaluate(record: &DeviceRecord, now: NaiveDateTime) -> MaintenanceAssessment {
    match days_until_due(record, now) {
        None => MaintenanceAssessment {
            status: MaintenanceStatus::Undetermined,
            days_until: None,
        },
        Some(days) => MaintenanceAssessment {
            status: classify_days(days),
            days_until: Some(days),
        },
    }
}

/// 下次到期日 = 参考日期 + 周期天数
pub fn next_due(reference: NaiveDate, interval_days: u32) -> AppResult<NaiveDate> {
    reference
        .checked_add_days(Days::new(u64::from(interval_days)))
        .ok_or_else(|| {
            AppError::validation_error(format!(
                "日期 {} 加 {} 天超出可表示范围",
                reference, interval_days
            ))
        })
}

/// 新设备的下次到期日：有安装日期时为安装日期 + 周期，否则为空
pub fn initial_next_due(installation_date: Option<NaiveDate>, interval_days: u32) -> AppResult<Option<NaiveDate>> {
    installation_date
        .map(|installed| next_due(installed, interval_days))
        .transpose()
}

/// 周期变更后的下次到期日：只有已有维护记录时才重新计算
pub fn rescheduled_next_due(record: &DeviceRecord, interval_days: u32) -> AppResult<Option<NaiveDate>> {
    match record.last_maintenance {
        Some(last) => next_due(last, interval_days).map(Some),
        None => Ok(record.next_maintenance),
    }
}
