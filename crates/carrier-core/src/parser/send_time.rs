//! Scheduling-text parser.
//!
//! Turns free-form text from the compose form into a concrete send instant:
//!
//! - `""` sends now
//! - `"+1d 2h"` / `"+1d2h"`: relative, now plus day/hour/minute offsets
//! - `"7-4 16:05"`: absolute, month-day and/or hour:minute, unset fields
//!   keep their current value
//!
//! Validation and application share a single token classifier, so any token
//! accepted during validation is guaranteed to apply without a numeric error.

use chrono::{DateTime, Datelike, Local, LocalResult, NaiveDate, NaiveTime, TimeDelta, TimeZone, Timelike};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendTimeError {
    #[error("invalid format: {0}")]
    Malformed(String),
}

/// Parse scheduling text into the instant the message should be sent.
pub fn parse_send_time(text: &str) -> Result<DateTime<Local>, SendTimeError> {
    parse_at(text, Local::now())
}

fn parse_at(text: &str, now: DateTime<Local>) -> Result<DateTime<Local>, SendTimeError> {
    let trimmed = text.trim_matches(|c: char| c == ' ' || c == '\t' || c == '\n');
    if trimmed.is_empty() {
        return Ok(now);
    }
    let data = trimmed.to_lowercase();
    match data.strip_prefix('+') {
        Some(rest) => parse_relative(rest, trimmed, now),
        None => parse_absolute(&data, trimmed, now),
    }
}

#[derive(Clone, Copy, Debug)]
enum OffsetUnit {
    Days,
    Hours,
    Minutes,
}

/// Split a relative token into `<n><unit>` segments, consuming the whole
/// token. `"1d"` is one segment, `"1d2h"` two; anything left over (missing
/// digits, unknown unit suffix) rejects the token.
fn scan_offsets(token: &str) -> Option<Vec<(u32, OffsetUnit)>> {
    let mut segments = Vec::new();
    let mut rest = token;
    while !rest.is_empty() {
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits == 0 {
            return None;
        }
        let value: u32 = rest[..digits].parse().ok()?;
        let unit = match rest.as_bytes().get(digits) {
            Some(b'd') => OffsetUnit::Days,
            Some(b'h') => OffsetUnit::Hours,
            Some(b'm') => OffsetUnit::Minutes,
            _ => return None,
        };
        segments.push((value, unit));
        rest = &rest[digits + 1..];
    }
    if segments.is_empty() {
        None
    } else {
        Some(segments)
    }
}

/// `+N[d|h|m]...`: offsets from now, applied in token order. Order never
/// changes the result: each segment is a monotonic duration addition.
fn parse_relative(
    rest: &str,
    original: &str,
    now: DateTime<Local>,
) -> Result<DateTime<Local>, SendTimeError> {
    let malformed = || SendTimeError::Malformed(original.to_string());

    let mut offsets = Vec::new();
    for token in rest.trim_matches(' ').split(' ') {
        match scan_offsets(token) {
            Some(segments) => offsets.extend(segments),
            None => return Err(malformed()),
        }
    }
    if offsets.is_empty() {
        return Err(malformed());
    }

    let mut result = now;
    for (value, unit) in offsets {
        let delta = match unit {
            OffsetUnit::Days => TimeDelta::try_days(value as i64),
            OffsetUnit::Hours => TimeDelta::try_hours(value as i64),
            OffsetUnit::Minutes => TimeDelta::try_minutes(value as i64),
        };
        result = delta
            .and_then(|d| result.checked_add_signed(d))
            .ok_or_else(malformed)?;
    }
    Ok(result)
}

fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

fn days_in_month(month: u32, year: i32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}

/// `M-D`, month 1-12, day bounded by the month's length in `year`.
fn scan_date(token: &str, year: i32) -> Option<(u32, u32)> {
    let parts: Vec<&str> = token.split('-').collect();
    if parts.len() != 2 {
        return None;
    }
    let month: u32 = parts[0].parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    let day: u32 = parts[1].parse().ok()?;
    if day < 1 || day > days_in_month(month, year) {
        return None;
    }
    Some((month, day))
}

/// `H:M`, hour 0-24 and minute 0-60 inclusive. The permissive upper edges
/// are accepted as-is and roll forward during application (24:00 lands on
/// the next day's midnight).
fn scan_time(token: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = token.split(':').collect();
    if parts.len() != 2 {
        return None;
    }
    let hour: u32 = parts[0].parse().ok()?;
    if hour > 24 {
        return None;
    }
    let minute: u32 = parts[1].parse().ok()?;
    if minute > 60 {
        return None;
    }
    Some((hour, minute))
}

/// Absolute expression: recognized date tokens overwrite month/day of now,
/// recognized time tokens overwrite hour/minute; year, seconds and
/// sub-seconds are preserved. Unrecognized tokens are ignored, but at least
/// one token must match.
fn parse_absolute(
    data: &str,
    original: &str,
    now: DateTime<Local>,
) -> Result<DateTime<Local>, SendTimeError> {
    let malformed = || SendTimeError::Malformed(original.to_string());

    let mut date = None;
    let mut time = None;
    for token in data.split(' ') {
        if let Some(month_day) = scan_date(token, now.year()) {
            date = Some(month_day);
        } else if let Some(hour_minute) = scan_time(token) {
            time = Some(hour_minute);
        }
    }
    if date.is_none() && time.is_none() {
        return Err(malformed());
    }

    let (month, day) = date.unwrap_or((now.month(), now.day()));
    let (hour, minute) = time.unwrap_or((now.hour(), now.minute()));

    // Build from the selected day's midnight by duration addition, so the
    // permissive 24:00 / :60 edges carry into the next unit instead of
    // producing an invalid wall-clock time.
    let base = NaiveDate::from_ymd_opt(now.year(), month, day)
        .ok_or_else(malformed)?
        .and_time(NaiveTime::MIN);
    let naive = base
        + TimeDelta::hours(hour as i64)
        + TimeDelta::minutes(minute as i64)
        + TimeDelta::seconds(now.second() as i64)
        + TimeDelta::nanoseconds(now.nanosecond() as i64);

    resolve_local(naive).ok_or_else(malformed)
}

/// Map a wall-clock time onto the local timezone. Ambiguous times (DST
/// fall-back) resolve to the earlier instant; nonexistent times (DST gap)
/// shift forward one hour.
fn resolve_local(naive: chrono::NaiveDateTime) -> Option<DateTime<Local>> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(instant) => Some(instant),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => Local
            .from_local_datetime(&(naive + TimeDelta::hours(1)))
            .earliest(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    // Wednesday afternoon, seconds deliberately non-zero
    fn now() -> DateTime<Local> {
        at(2023, 5, 17, 8, 42, 37)
    }

    #[test]
    fn test_empty_input_is_now() {
        assert_eq!(parse_at("", now()), Ok(now()));
        assert_eq!(parse_at("  \t\n", now()), Ok(now()));
    }

    #[test]
    fn test_relative_single_units() {
        assert_eq!(parse_at("+1d", now()), Ok(at(2023, 5, 18, 8, 42, 37)));
        assert_eq!(parse_at("+3h", now()), Ok(at(2023, 5, 17, 11, 42, 37)));
        assert_eq!(parse_at("+10m", now()), Ok(at(2023, 5, 17, 8, 52, 37)));
        assert_eq!(parse_at("+0d", now()), Ok(now()));
    }

    #[test]
    fn test_relative_token_order_is_irrelevant() {
        let expected = Ok(at(2023, 5, 18, 10, 42, 37));
        assert_eq!(parse_at("+1d2h", now()), expected);
        assert_eq!(parse_at("+2h1d", now()), expected);
        assert_eq!(parse_at("+1d 2h", now()), expected);
        assert_eq!(parse_at("+2h 1d", now()), expected);
    }

    #[test]
    fn test_relative_repeated_units_accumulate() {
        assert_eq!(parse_at("+1h 1h 30m", now()), Ok(at(2023, 5, 17, 11, 12, 37)));
    }

    #[test]
    fn test_relative_rejects_malformed_tokens() {
        for text in ["+", "+x", "+1x", "+d", "+1d x", "+1.5h", "+-1d"] {
            assert_eq!(
                parse_at(text, now()),
                Err(SendTimeError::Malformed(text.to_string())),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_relative_units_are_case_insensitive() {
        assert_eq!(parse_at("+1D", now()), Ok(at(2023, 5, 18, 8, 42, 37)));
    }

    #[test]
    fn test_absolute_time_preserves_date_and_seconds() {
        assert_eq!(parse_at("12:30", now()), Ok(at(2023, 5, 17, 12, 30, 37)));
    }

    #[test]
    fn test_absolute_date_preserves_time() {
        assert_eq!(parse_at("7-4", now()), Ok(at(2023, 7, 4, 8, 42, 37)));
    }

    #[test]
    fn test_absolute_date_and_time_combined() {
        assert_eq!(parse_at("7-4 16:05", now()), Ok(at(2023, 7, 4, 16, 5, 37)));
        assert_eq!(parse_at("16:05 7-4", now()), Ok(at(2023, 7, 4, 16, 5, 37)));
    }

    #[test]
    fn test_absolute_later_tokens_overwrite_earlier() {
        assert_eq!(parse_at("7-4 8-5", now()), Ok(at(2023, 8, 5, 8, 42, 37)));
    }

    #[test]
    fn test_absolute_ignores_unrecognized_tokens() {
        assert_eq!(parse_at("around 12:30 maybe", now()), Ok(at(2023, 5, 17, 12, 30, 37)));
    }

    #[test]
    fn test_absolute_with_no_recognized_token_fails() {
        assert_eq!(
            parse_at("tomorrow", now()),
            Err(SendTimeError::Malformed("tomorrow".to_string()))
        );
    }

    #[test]
    fn test_month_13_is_rejected() {
        assert!(parse_at("13-01", now()).is_err());
        assert!(parse_at("0-01", now()).is_err());
    }

    #[test]
    fn test_february_29_depends_on_leap_year() {
        let non_leap = at(2023, 5, 17, 8, 42, 37);
        assert!(parse_at("2-29", non_leap).is_err());

        let leap = Local.with_ymd_and_hms(2024, 5, 17, 8, 42, 37).unwrap();
        assert_eq!(
            parse_at("2-29", leap),
            Ok(Local.with_ymd_and_hms(2024, 2, 29, 8, 42, 37).unwrap())
        );
        // day 30 exceeds even a leap February
        assert!(parse_at("2-30", leap).is_err());
    }

    #[test]
    fn test_day_bound_follows_month_length() {
        assert!(parse_at("4-31", now()).is_err());
        assert!(parse_at("4-30", now()).is_ok());
        assert!(parse_at("4-0", now()).is_err());
    }

    #[test]
    fn test_hour_24_rolls_to_next_midnight() {
        assert_eq!(parse_at("24:00", now()), Ok(at(2023, 5, 18, 0, 0, 37)));
    }

    #[test]
    fn test_minute_60_rolls_to_next_hour() {
        assert_eq!(parse_at("8:60", now()), Ok(at(2023, 5, 17, 9, 0, 37)));
    }

    #[test]
    fn test_hour_25_is_rejected() {
        assert!(parse_at("25:00", now()).is_err());
        assert!(parse_at("8:61", now()).is_err());
    }

    #[test]
    fn test_error_quotes_the_original_text() {
        assert_eq!(
            parse_at("  +1y  ", now()),
            Err(SendTimeError::Malformed("+1y".to_string()))
        );
    }
}
