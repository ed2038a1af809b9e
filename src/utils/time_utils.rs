use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

/// 一天的秒数
pub const SECONDS_PER_DAY: i64 = 24 * 3600;

/// 时钟抽象
///
/// 维护状态评估只依赖"当前时间"，通过该 trait 注入，测试中可替换为固定时刻
#[cfg_attr(test, mockall::automock)]
pub trait Clock {
    /// 当前本地时间
    fn now(&self) -> NaiveDateTime;

    /// 当前本地日期
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// 系统时钟
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// 固定时钟（命令行 `--today` 参数与测试使用）
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// 以某天零点作为当前时刻
    pub fn at_date(date: NaiveDate) -> Self {
        Self(start_of_day(date))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// 日期当天零点
#[inline]
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// `target - now` 的整天数，向负无穷取整
///
/// 例如目标为今天零点、当前为今天上午10点时结果为 -1
#[inline]
pub fn floor_days_between(now: NaiveDateTime, target: NaiveDateTime) -> i64 {
    (target - now).num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// 文件名使用的日期戳
#[inline]
pub fn date_stamp(now: NaiveDateTime) -> String {
    now.format("%Y%m%d").to_string()
}

/// 文件名使用的时间戳
#[inline]
pub fn datetime_stamp(now: NaiveDateTime) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

/// 解析用户输入或表格中的日期字符串
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];
    const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
}
