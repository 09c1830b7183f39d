//! Field parsers for amount and date cells.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use regex::Regex;
use rust_decimal::Decimal;

static CURRENCY_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\$,]").expect("valid currency regex"));

/// Date-only layouts, tried in order. Month-first beats day-first for
/// ambiguous slash dates since the exports are from US banks.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%Y/%m/%d",
    "%m-%d-%Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %I:%M:%S %p",
    "%Y-%m-%d %I:%M %p",
];

/// Strip `$` and thousands separators, then parse a signed decimal.
///
/// `"$1,234.56"` -> 1234.56, `"-$12.00"` -> -12.00
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned = CURRENCY_NOISE.replace_all(raw, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(cleaned).ok()
}

/// Best-effort calendar date parsing for statement cells.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            // "%Y" happily reads "24" as year 24; leave two-digit years to "%y"
            if fmt.contains("%Y") && date.year() < 1000 {
                continue;
            }
            return Some(date);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_amount_strips_currency_noise() {
        assert_eq!(parse_amount("$1,234.56"), Some(dec("1234.56")));
        assert_eq!(parse_amount("-$12.00"), Some(dec("-12.00")));
        assert_eq!(parse_amount(" 4.5 "), Some(dec("4.50")));
        assert_eq!(parse_amount("-1,000"), Some(dec("-1000")));
    }

    #[test]
    fn test_amount_rejects_garbage() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("$"), None);
        assert_eq!(parse_amount("twelve"), None);
        assert_eq!(parse_amount("12.00 USD"), None);
    }

    #[test]
    fn test_iso_and_us_dates() {
        assert_eq!(parse_date("2024-01-05"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("01/05/2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("1/5/2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date(" 12/31/2023 "), Some(ymd(2023, 12, 31)));
    }

    #[test]
    fn test_two_digit_year() {
        assert_eq!(parse_date("01/05/24"), Some(ymd(2024, 1, 5)));
    }

    #[test]
    fn test_other_layouts() {
        assert_eq!(parse_date("2024/02/29"), Some(ymd(2024, 2, 29)));
        assert_eq!(parse_date("05 Jan 2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("Jan 05, 2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05 00:00:00"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05T13:45:00"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05T13:45:00-07:00"), Some(ymd(2024, 1, 5)));
    }

    #[test]
    fn test_twelve_hour_times() {
        assert_eq!(parse_date("1/5/2024 3:04 PM"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("01/05/2024 11:59:59 pm"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05 12:00 AM"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("1/5/2024 13:04 PM"), None);
    }

    #[test]
    fn test_unparseable_dates() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2024-13-01"), None);
        assert_eq!(parse_date("02/30/2024"), None);
    }
}
