//! 资产编号分配
//!
//! 单用户单会话：编号从插入时刻的当前台账推导，不会冲突

use crate::models::DeviceRecord;

/// 资产编号的序号部分；无法解析时视为 0
pub fn sequence_suffix(asset_id: &str) -> u32 {
    asset_id
        .rsplit('-')
        .next()
        .and_then(|suffix| suffix.trim().parse::<u32>().ok())
        .unwrap_or(0)
}

/// 为指定中心分配下一个资产编号：现有最大序号 + 1，三位补零
pub fn next_asset_id<'a, I>(records: I, center_code: &str) -> String
where
    I: IntoIterator<Item = &'a DeviceRecord>,
{
    let max_seq = records
        .into_iter()
        .filter(|record| record.center_code() == center_code)
        .map(|record| sequence_suffix(&record.asset_id))
        .max()
        .unwrap_or(0);

    format!("{}-{:03}", center_code, max_seq.saturating_add(1))
}
