//! 时间工具函数
//!
//! 日期→时间戳转换集中在这里，存储层只持有 `i64` Unix millis。
//! 营业日按服务器本地时区划分，回执编号和按日查询保持一致。

use chrono::{Local, NaiveDate, TimeZone, Utc};

use super::{AppError, AppResult};

/// Current time as Unix millis
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Current local date as YYYYMMDD (used for receipt numbering)
pub fn today_key() -> String {
    Local::now().format("%Y%m%d").to_string()
}

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date format: {}", date)))
}

/// 日期开始 (本地时区 00:00:00) → Unix millis
pub fn day_start_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .and_then(|n| Local.from_local_datetime(&n).earliest())
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(0)
}

/// 日期结束 → 次日 00:00:00 的 Unix millis
///
/// 返回次日零点时间戳，调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    day_start_millis(next_day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2025-01-31").is_ok());
        assert!(parse_date("31/01/2025").is_err());
    }

    #[test]
    fn test_day_bounds_exclusive() {
        let d = parse_date("2025-01-31").unwrap();
        assert_eq!(day_end_millis(d) - day_start_millis(d), 86_400_000);
    }
}
