//! Workbook and sheet name tooling.
//!
//! Report workbooks carry date-stamped, separator-delimited names
//! (`sales_20240131.xlsx`). These helpers split and strip the delimited
//! parts, extract `{...}` placeholders from name templates, and convert
//! between dates and the stamp/serial forms the grid application uses.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use regex::Regex;

/// Separator between a name's stem and its stamp suffix.
pub const SUFFIX_SEPARATOR: &str = "_";
/// Placeholder replaced with the most recent stamp when names are templated.
pub const PLACEHOLDER_LASTDATE: &str = "{LASTDATE}";

const STAMP_FORMAT_DATE: &str = "%Y%m%d";
const STAMP_FORMAT_TIME: &str = "%Y%m%d-%H%M%S";

/// The part before the first separator, or empty when there is none.
pub fn prefix<'a>(name: &'a str, separator: &str) -> &'a str {
    name.split_once(separator).map_or("", |(head, _)| head)
}

/// The part after the last separator, or empty when there is none.
pub fn suffix<'a>(name: &'a str, separator: &str) -> &'a str {
    name.rsplit_once(separator).map_or("", |(_, tail)| tail)
}

/// Drop everything up to and including the first separator.
pub fn strip_prefix<'a>(name: &'a str, separator: &str) -> &'a str {
    name.split_once(separator).map_or(name, |(_, tail)| tail)
}

/// Drop everything from the last separator on.
pub fn strip_suffix<'a>(name: &'a str, separator: &str) -> &'a str {
    name.rsplit_once(separator).map_or(name, |(head, _)| head)
}

/// Drop a specific leading `prefix` + separator, when present.
pub fn strip_named_prefix<'a>(name: &'a str, prefix: &str, separator: &str) -> &'a str {
    let full = format!("{prefix}{separator}");
    name.strip_prefix(&full).unwrap_or(name)
}

/// Drop a specific trailing separator + `suffix`, when present.
pub fn strip_named_suffix<'a>(name: &'a str, suffix: &str, separator: &str) -> &'a str {
    let full = format!("{separator}{suffix}");
    name.strip_suffix(&full).unwrap_or(name)
}

/// Contents of `{...}` placeholders, in order of appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    placeholders_in(template, "{", "}")
}

/// Placeholder contents for custom delimiters.
pub fn placeholders_in(template: &str, open: &str, close: &str) -> Vec<String> {
    let re = Regex::new(&format!(
        "{}(.*?){}",
        regex::escape(open),
        regex::escape(close)
    ))
    .unwrap();
    re.captures_iter(template)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Strip whitespace and unprintable characters from a name read off a
/// surface.
pub fn remove_unprintable(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect()
}

/// Date-only stamp, `YYYYMMDD`.
pub fn date_stamp(date: NaiveDate) -> String {
    date.format(STAMP_FORMAT_DATE).to_string()
}

/// Date-time stamp, `YYYYMMDD-HHMMSS`.
pub fn time_stamp(at: NaiveDateTime) -> String {
    at.format(STAMP_FORMAT_TIME).to_string()
}

/// Stamp for the current local time, in either form.
pub fn stamp_now(with_time: bool) -> String {
    let now = Local::now().naive_local();
    if with_time {
        time_stamp(now)
    } else {
        date_stamp(now.date())
    }
}

pub fn parse_date_stamp(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, STAMP_FORMAT_DATE).ok()
}

pub fn parse_time_stamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, STAMP_FORMAT_TIME).ok()
}

/// Parse either stamp form; date-only stamps come back at midnight.
pub fn parse_stamp(s: &str) -> Option<NaiveDateTime> {
    parse_time_stamp(s).or_else(|| parse_date_stamp(s).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

/// The grid application's serial number for a date (1900 date system).
pub fn excel_date_ordinal(date: NaiveDate) -> i64 {
    // Day count anchored so 1899-12-31 maps to serial 1.
    const SERIAL_OFFSET: i64 = 693_594;
    i64::from(date.num_days_from_ce()) - SERIAL_OFFSET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_and_suffix_parts() {
        assert_eq!(prefix("sales_20240131", "_"), "sales");
        assert_eq!(suffix("sales_20240131", "_"), "20240131");
        assert_eq!(prefix("a_b_c", "_"), "a");
        assert_eq!(suffix("a_b_c", "_"), "c");
        assert_eq!(prefix("plain", "_"), "");
        assert_eq!(suffix("plain", "_"), "");
    }

    #[test]
    fn test_strip_parts() {
        assert_eq!(strip_prefix("a_b_c", "_"), "b_c");
        assert_eq!(strip_suffix("a_b_c", "_"), "a_b");
        assert_eq!(strip_prefix("plain", "_"), "plain");
        assert_eq!(strip_suffix("plain", "_"), "plain");
    }

    #[test]
    fn test_strip_named_parts() {
        assert_eq!(strip_named_prefix("sales_q1_final", "sales", "_"), "q1_final");
        assert_eq!(strip_named_prefix("sales_q1", "costs", "_"), "sales_q1");
        assert_eq!(strip_named_suffix("sales_20240131", "20240131", "_"), "sales");
        assert_eq!(strip_named_suffix("sales_20240131", "other", "_"), "sales_20240131");
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(
            placeholders("report_{LASTDATE}_{REGION}.xlsx"),
            vec!["LASTDATE".to_string(), "REGION".to_string()]
        );
        assert!(placeholders("no placeholders").is_empty());
        assert_eq!(placeholders_in("a<x>b<y>", "<", ">"), vec!["x", "y"]);
    }

    #[test]
    fn test_remove_unprintable() {
        assert_eq!(remove_unprintable(" a b\tc\u{7f}d \n"), "abcd");
        assert_eq!(remove_unprintable("clean"), "clean");
    }

    #[test]
    fn test_stamp_round_trip() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(date_stamp(date), "20240131");
        assert_eq!(parse_date_stamp("20240131"), Some(date));

        let at = date.and_hms_opt(13, 5, 30).unwrap();
        assert_eq!(time_stamp(at), "20240131-130530");
        assert_eq!(parse_time_stamp("20240131-130530"), Some(at));

        // parse_stamp accepts both forms.
        assert_eq!(parse_stamp("20240131-130530"), Some(at));
        assert_eq!(parse_stamp("20240131"), Some(date.and_hms_opt(0, 0, 0).unwrap()));
        assert_eq!(parse_stamp("2024-01-31"), None);
    }

    #[test]
    fn test_stamp_rejects_trailing_garbage() {
        assert!(parse_date_stamp("20240131-130530").is_none());
        assert!(parse_time_stamp("20240131").is_none());
    }

    #[test]
    fn test_excel_date_ordinal() {
        // Stable from March 1900 onward.
        assert_eq!(
            excel_date_ordinal(NaiveDate::from_ymd_opt(1900, 3, 1).unwrap()),
            61
        );
        assert_eq!(
            excel_date_ordinal(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            45292
        );
    }
}
