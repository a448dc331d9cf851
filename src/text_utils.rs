use std::ops::Index;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;

const DISPLAY_DATE_FORMAT: &str = "%B %-d, %Y";

fn to_int<T: std::str::FromStr>(num_str: &str, date_str: &str) -> Result<T, String> {
    match num_str.parse::<T>() {
        Ok(x) => Ok(x),
        Err(_) => Err(format!("Error parsing {} from the date {}", num_str, date_str)),
    }
}

/// Accepts `2024-01-15`, `2024-01-15 10:42:32.123` and `2024-01-15T10:42:32Z`.
/// Offsets are ignored, the wall clock time is kept.
pub fn parse_date_time(buf: &str) -> Result<NaiveDateTime, String> {
    lazy_static! {
        static ref DATE_REGEX: Regex = Regex::new(
            r"^(\d{4})-(\d{1,2})-(\d{1,2})(?:[ T](\d{1,2}):(\d{1,2})(?::(\d{1,2}))?(?:\.\d+)?)?(?:Z|[+-]\d{2}:?\d{2})?$"
        ).unwrap();
    }

    let buf = buf.trim();
    let Some(caps) = DATE_REGEX.captures(buf) else {
        return Err(format!("Unable to parse date time {}", buf));
    };

    let to_i32 = |num_str: &str| to_int::<i32>(num_str, buf);
    let to_u32 = |num_str: &str| to_int::<u32>(num_str, buf);
    let opt_u32 = |idx: usize| caps.get(idx).map(|m| to_u32(m.as_str())).unwrap_or(Ok(0));

    let y: i32 = to_i32(caps.index(1))?;
    let m: u32 = to_u32(caps.index(2))?;
    let d: u32 = to_u32(caps.index(3))?;
    let h: u32 = opt_u32(4)?;
    let mn: u32 = opt_u32(5)?;
    let s: u32 = opt_u32(6)?;

    let Some(date) = NaiveDate::from_ymd_opt(y, m, d) else {
        return Err(format!("Invalid date {}", buf));
    };
    let Some(time) = NaiveTime::from_hms_opt(h, mn, s) else {
        return Err(format!("Invalid time {}", buf));
    };

    Ok(NaiveDateTime::new(date, time))
}

/// `January 15, 2024`
pub fn format_date(date_time: &NaiveDateTime) -> String {
    date_time.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Formats a date-like string for display. Missing or unparseable input
/// yields an empty string.
pub fn format_display_date(input: Option<&str>) -> String {
    match input.map(str::trim) {
        None | Some("") => String::new(),
        Some(value) => match parse_date_time(value) {
            Ok(date_time) => format_date(&date_time),
            Err(_) => String::new(),
        },
    }
}

/// `2024-01-15`, used for `<time datetime>` and the sitemap
pub fn format_iso_date(date_time: &NaiveDateTime) -> String {
    date_time.format("%Y-%m-%d").to_string()
}

/// Lowercase ascii slug with single dashes, e.g. `Ãbaco & Co.` -> `abaco-co`
pub fn slugify(text: &str) -> String {
    let ascii = unidecode::unidecode(text);
    let mut slug = String::with_capacity(ascii.len());
    let mut prev_dash = true;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            prev_dash = false;
        } else if !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_time() {
        let date_time = parse_date_time("2017-09-10 10:42:32.123").unwrap();
        assert_eq!(date_time.format("%Y-%m-%d %H:%M:%S").to_string(), "2017-09-10 10:42:32");

        let date_time = parse_date_time("2017-09-10T10:42:32Z").unwrap();
        assert_eq!(date_time.format("%Y-%m-%d %H:%M:%S").to_string(), "2017-09-10 10:42:32");

        let date_time = parse_date_time("2017-09-10T10:42:32+02:00").unwrap();
        assert_eq!(date_time.format("%Y-%m-%d %H:%M:%S").to_string(), "2017-09-10 10:42:32");

        let date_time = parse_date_time("2017-09-10").unwrap();
        assert_eq!(date_time.format("%Y-%m-%d %H:%M:%S").to_string(), "2017-09-10 00:00:00");
    }

    #[test]
    fn test_parse_invalid_dates() {
        assert!(parse_date_time("").is_err());
        assert!(parse_date_time("yesterday").is_err());
        assert!(parse_date_time("2024-13-01").is_err());
        assert!(parse_date_time("2024-02-30").is_err());
        assert!(parse_date_time("2024-01-01 25:00:00").is_err());
    }

    #[test]
    fn test_format_display_date() {
        assert_eq!(format_display_date(Some("2024-01-15")), "January 15, 2024");
        assert_eq!(format_display_date(Some("2024-01-05 08:00:00")), "January 5, 2024");
        assert_eq!(format_display_date(Some(" 2023-12-31T23:59:59Z ")), "December 31, 2023");
    }

    #[test]
    fn test_format_display_date_fallback() {
        assert_eq!(format_display_date(None), "");
        assert_eq!(format_display_date(Some("")), "");
        assert_eq!(format_display_date(Some("   ")), "");
        assert_eq!(format_display_date(Some("not a date")), "");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Post title of mine Ãbaco - dir2 "), "post-title-of-mine-abaco-dir2");
        assert_eq!(slugify("C++ & Rust!"), "c-rust");
        assert_eq!(slugify("+++"), "");
    }
}
