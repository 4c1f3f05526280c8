//! Human-readable note timestamps.
//!
//! Notes store their `date` as display text in the en-US locale layout
//! (`1/2/2024, 3:04:05 PM`). Sorting needs the value back, so parsing
//! accepts that layout plus the ISO shapes older exports may carry.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// `chrono` format string for newly stamped notes.
pub const NOTE_DATE_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

static LOCALE_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d{1,2})/(\d{1,2})/(\d{4})(?:,?\s+(\d{1,2}):(\d{2})(?::(\d{2}))?(?:\s*([AaPp][Mm]))?)?$",
    )
    .expect("valid locale date regex")
});

/// Renders a note timestamp in the locale display layout.
pub fn format_note_date(at: NaiveDateTime) -> String {
    at.format(NOTE_DATE_FORMAT).to_string()
}

/// Parses a stored note date.
///
/// Returns `None` for blank or unrecognized values; callers treat those as
/// incomparable.
pub fn parse_note_date(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(parsed) = parse_locale_date(trimmed) {
        return Some(parsed);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.naive_utc());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Some(parsed);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn parse_locale_date(value: &str) -> Option<NaiveDateTime> {
    let caps = LOCALE_DATE_RE.captures(value)?;
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    let Some(hour) = caps.get(4) else {
        return date.and_hms_opt(0, 0, 0);
    };
    let mut hour: u32 = hour.as_str().parse().ok()?;
    let minute: u32 = caps[5].parse().ok()?;
    let second: u32 = match caps.get(6) {
        Some(second) => second.as_str().parse().ok()?,
        None => 0,
    };

    if let Some(meridiem) = caps.get(7) {
        if hour == 0 || hour > 12 {
            return None;
        }
        let is_pm = meridiem.as_str().eq_ignore_ascii_case("pm");
        hour = match (hour, is_pm) {
            (12, false) => 0,
            (12, true) => 12,
            (value, true) => value + 12,
            (value, false) => value,
        };
    }

    date.and_hms_opt(hour, minute, second)
}

#[cfg(test)]
mod tests {
    use super::{format_note_date, parse_note_date};
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn format_uses_locale_layout() {
        assert_eq!(format_note_date(at(2024, 1, 2, 15, 4, 5)), "1/2/2024, 3:04:05 PM");
        assert_eq!(format_note_date(at(2024, 12, 25, 0, 30, 0)), "12/25/2024, 12:30:00 AM");
    }

    #[test]
    fn parse_accepts_formatted_output() {
        let value = at(2024, 7, 9, 23, 59, 1);
        assert_eq!(parse_note_date(&format_note_date(value)), Some(value));
    }

    #[test]
    fn parse_accepts_date_only_and_iso_shapes() {
        assert_eq!(parse_note_date("2/2/2024"), Some(at(2024, 2, 2, 0, 0, 0)));
        assert_eq!(parse_note_date("2024-03-04"), Some(at(2024, 3, 4, 0, 0, 0)));
        assert_eq!(
            parse_note_date("2024-03-04T05:06:07"),
            Some(at(2024, 3, 4, 5, 6, 7))
        );
        assert_eq!(
            parse_note_date("2024-03-04T05:06:07Z"),
            Some(at(2024, 3, 4, 5, 6, 7))
        );
        assert_eq!(
            parse_note_date("3/4/2024, 17:06"),
            Some(at(2024, 3, 4, 17, 6, 0))
        );
    }

    #[test]
    fn parse_rejects_garbage_and_impossible_dates() {
        assert_eq!(parse_note_date(""), None);
        assert_eq!(parse_note_date("someday"), None);
        assert_eq!(parse_note_date("13/40/2024"), None);
        assert_eq!(parse_note_date("1/1/2024, 13:00:00 PM"), None);
    }
}
