//! iCalendar (RFC 5545) serialization of contribution days.
//!
//! Each day becomes an all-day `VEVENT` spanning exactly that date.

use crate::model::ContributionDay;
use chrono::{DateTime, Days, NaiveDate, Utc};

pub const PRODID: &str = "-//gplan//contribution calendar//EN";

const MAX_LINE_OCTETS: usize = 75;

pub fn summary(level: u8) -> String {
    if level == 1 {
        "1 contribution".to_string()
    } else {
        format!("{level} contributions")
    }
}

/// Serializes `days` into one `VCALENDAR`, stamping every event with `stamp`.
pub fn write_calendar(days: &[ContributionDay], stamp: DateTime<Utc>) -> String {
    let dtstamp = stamp.format("%Y%m%dT%H%M%SZ").to_string();
    let mut out = String::new();

    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, "VERSION:2.0");
    push_line(&mut out, &format!("PRODID:{PRODID}"));
    push_line(&mut out, "CALSCALE:GREGORIAN");

    for day in days {
        // date ranges are validated when the calendar is built
        let end = day.date.checked_add_days(Days::new(1)).unwrap_or(NaiveDate::MAX);
        push_line(&mut out, "BEGIN:VEVENT");
        push_line(&mut out, &format!("UID:{}-{}@gplan", date_value(day.date), day.level));
        push_line(&mut out, &format!("DTSTAMP:{dtstamp}"));
        push_line(&mut out, &format!("DTSTART;VALUE=DATE:{}", date_value(day.date)));
        push_line(&mut out, &format!("DTEND;VALUE=DATE:{}", date_value(end)));
        push_line(&mut out, &format!("SUMMARY:{}", escape_text(&summary(day.level))));
        push_line(&mut out, "TRANSP:TRANSPARENT");
        push_line(&mut out, "END:VEVENT");
    }

    push_line(&mut out, "END:VCALENDAR");
    out
}

fn date_value(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

pub fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Appends `line` with CRLF, folding at 75 octets without splitting a character.
fn push_line(out: &mut String, line: &str) {
    let mut width = 0;
    for c in line.chars() {
        let len = c.len_utf8();
        if width + len > MAX_LINE_OCTETS {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(c);
        width += len;
    }
    out.push_str("\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32, level: u8) -> ContributionDay {
        ContributionDay {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            level,
        }
    }

    #[test]
    fn writes_one_all_day_event_per_day() {
        let stamp = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let ics = write_calendar(&[day(2024, 1, 7, 1), day(2024, 12, 31, 3)], stamp);

        assert!(ics.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
        assert!(ics.contains("DTSTART;VALUE=DATE:20240107\r\nDTEND;VALUE=DATE:20240108\r\n"));
        assert!(ics.contains("DTEND;VALUE=DATE:20250101\r\n"));
        assert!(ics.contains("SUMMARY:1 contribution\r\n"));
        assert!(ics.contains("SUMMARY:3 contributions\r\n"));
        assert!(ics.contains("DTSTAMP:20240301T123000Z\r\n"));
    }

    #[test]
    fn empty_day_list_is_still_a_calendar() {
        let ics = write_calendar(&[], Utc::now());
        assert!(!ics.contains("VEVENT"));
        assert!(ics.contains("PRODID:"));
    }

    #[test]
    fn escapes_text_values() {
        assert_eq!(escape_text("a,b;c\\d\ne"), "a\\,b\\;c\\\\d\\ne");
    }

    #[test]
    fn folds_long_lines() {
        let mut out = String::new();
        push_line(&mut out, &"x".repeat(160));
        let lines: Vec<&str> = out.trim_end_matches("\r\n").split("\r\n").collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].len(), 75);
        assert!(lines[1].starts_with(' '));
        assert!(lines.iter().all(|l| l.len() <= 75));
    }
}
