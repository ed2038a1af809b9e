/// 服务层基础trait定义
/// 存储后端抽象，便于应用状态在测试中替换为模拟实现

use std::path::Path;
use crate::models::DeviceDataset;
use crate::utils::error::AppResult;

/// 设备台账存储
///
/// 整体读入、整体写回；单用户使用，不做并发控制
#[cfg_attr(test, mockall::automock)]
pub trait DeviceRepository {
    /// 存储位置（用于日志与提示）
    fn location(&self) -> &Path;

    /// 读取整个台账
    fn load(&self) -> AppResult<DeviceDataset>;

    /// 写回整个台账；失败时原有存储保持不变
    fn save(&self, dataset: &DeviceDataset) -> AppResult<()>;
}
