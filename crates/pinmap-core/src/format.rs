//! 展示格式

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::memory::LngLat;

const TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// 以本地时区格式化时间戳，例如 `3/7/2024, 2:05:09 PM`
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    format_timestamp_in(at, &Local)
}

pub fn format_timestamp_in<Tz>(at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    at.with_timezone(tz).format(TIMESTAMP_FORMAT).to_string()
}

/// 草稿坐标标签，保留 4 位小数
pub fn pinned_label(at: LngLat) -> String {
    format!("Pinned location: {:.4}, {:.4}", at.lat, at.lng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_format_timestamp_in_offset() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 19, 5, 9).unwrap();
        let toronto = FixedOffset::west_opt(5 * 3600).unwrap();

        assert_eq!(format_timestamp_in(&at, &toronto), "3/7/2024, 2:05:09 PM");
        assert_eq!(format_timestamp_in(&at, &Utc), "3/7/2024, 7:05:09 PM");
    }

    #[test]
    fn test_pinned_label() {
        assert_eq!(
            pinned_label(LngLat::new(-79.383_21, 43.653_26)),
            "Pinned location: 43.6533, -79.3832"
        );
    }
}
