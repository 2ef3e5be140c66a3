// Date and start-time formatting for display.

use chrono::{Datelike, Local, NaiveDate, NaiveTime, TimeZone, Timelike};
use chrono_tz::Tz;

/// Convert a 24-hour `HH:MM` start time to a compact 12-hour form
/// (`"19:05"` becomes `"7:05p"`).
///
/// Missing, empty and `"TBD"` times render as `"TBD"`; anything that does
/// not parse is returned unchanged.
pub fn format_time_12_hour(time: Option<&str>) -> String {
    let time = match time {
        None | Some("") | Some("TBD") => return "TBD".to_string(),
        Some(t) => t,
    };
    let Ok(parsed) = NaiveTime::parse_from_str(time, "%H:%M") else {
        return time.to_string();
    };
    let (pm, hour) = parsed.hour12();
    let suffix = if pm { "p" } else { "a" };
    format!("{hour}:{:02}{suffix}", parsed.minute())
}

/// Abbreviation `tz` uses at noon on `date` (`EDT` in July, `EST` in
/// January). Falls back to the IANA name when the date does not parse.
pub fn zone_abbreviation(date: &str, tz: Tz) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(12, 0, 0))
        .and_then(|noon| tz.from_local_datetime(&noon).earliest())
        .map(|local| local.format("%Z").to_string())
        .unwrap_or_else(|| tz.name().to_string())
}

/// Season year from a `YYYY-MM-DD` date, or the current year when the date
/// has no numeric year prefix.
pub fn extract_year_from_date(date: &str) -> i32 {
    date.split('-')
        .next()
        .and_then(|year| year.parse().ok())
        .unwrap_or_else(|| Local::now().year())
}

/// Today's date as `YYYY-MM-DD` in local time.
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}
