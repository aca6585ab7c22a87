//! Timetable clock times.
//!
//! Timetable sources carry times as raw strings, usually `HH:MM:SS` but
//! sometimes `HH:MM` or `H:MM`, and sometimes placeholders such as `Source` or an
//! empty string. Raw strings are kept for display; this module provides the
//! parsed form used for ordering.

use std::cmp::Ordering;
use std::fmt;

use chrono::{NaiveTime, Timelike};

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time of day parsed from a timetable string.
///
/// # Examples
///
/// ```
/// use train_assistant::domain::ClockTime;
///
/// let t = ClockTime::parse("06:05:00").unwrap();
/// assert_eq!(t.to_string(), "06:05:00");
///
/// assert!(ClockTime::parse("14:30").is_ok());
/// assert!(ClockTime::parse("Source").is_err());
/// assert!(ClockTime::parse("25:00").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Parse `H:MM` or `H:MM:SS`, with a one- or two-digit hour.
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let parts: Vec<&[u8]> = s.trim().as_bytes().split(|&b| b == b':').collect();

        let (hour, minute, second) = match parts[..] {
            [h, m] => (h, m, None),
            [h, m, sec] => (h, m, Some(sec)),
            _ => return Err(TimeError::new("expected H:MM or H:MM:SS format")),
        };

        let hour = parse_hour(hour).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        let minute =
            parse_two_digits(minute).ok_or_else(|| TimeError::new("invalid minute digits"))?;
        let second = match second {
            Some(sec) => {
                parse_two_digits(sec).ok_or_else(|| TimeError::new("invalid second digits"))?
            }
            None => 0,
        };

        NaiveTime::from_hms_opt(hour, minute, second)
            .map(ClockTime)
            .ok_or_else(|| TimeError::new("time out of range"))
    }
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({})", self)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.0.hour(),
            self.0.minute(),
            self.0.second()
        )
    }
}

/// One or two ASCII digits.
fn parse_hour(bytes: &[u8]) -> Option<u32> {
    match bytes {
        [d] if d.is_ascii_digit() => Some(u32::from(d - b'0')),
        _ => parse_two_digits(bytes),
    }
}

/// Parse exactly two ASCII digits.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    match bytes {
        [a, b] if a.is_ascii_digit() && b.is_ascii_digit() => {
            Some(((a - b'0') * 10 + (b - b'0')) as u32)
        }
        _ => None,
    }
}

/// Order two raw timetable times, unparseable ones last.
///
/// This is the departure ordering used by route search: any valid time sorts
/// before any missing or malformed one, and two unparseable values compare
/// equal so a stable sort keeps their original order.
pub fn compare_raw_times(a: &str, b: &str) -> Ordering {
    match (ClockTime::parse(a).ok(), ClockTime::parse(b).ok()) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hh_mm_ss() {
        let t = ClockTime::parse("23:59:59").unwrap();
        assert_eq!(t.to_string(), "23:59:59");
    }

    #[test]
    fn parse_hh_mm() {
        let t = ClockTime::parse("09:00").unwrap();
        assert_eq!(t.to_string(), "09:00:00");
    }

    #[test]
    fn parse_single_digit_hour() {
        assert_eq!(ClockTime::parse("9:00").unwrap().to_string(), "09:00:00");
        assert_eq!(ClockTime::parse("7:05:30").unwrap().to_string(), "07:05:30");
        assert_eq!(compare_raw_times("9:00", "10:00"), Ordering::Less);
        assert_eq!(compare_raw_times("9:00", "09:00:00"), Ordering::Equal);
    }

    #[test]
    fn parse_trims_whitespace() {
        assert!(ClockTime::parse(" 10:15:00 ").is_ok());
    }

    #[test]
    fn reject_placeholders_and_garbage() {
        assert!(ClockTime::parse("").is_err());
        assert!(ClockTime::parse("Source").is_err());
        assert!(ClockTime::parse("Destination").is_err());
        assert!(ClockTime::parse("99:99:99").is_err());
        assert!(ClockTime::parse("9:0").is_err());
        assert!(ClockTime::parse("123:00").is_err());
        assert!(ClockTime::parse(":00").is_err());
        assert!(ClockTime::parse("09:00:00:00").is_err());
        assert!(ClockTime::parse("09-00").is_err());
        assert!(ClockTime::parse("09:00-00").is_err());
    }

    #[test]
    fn ordering_matches_time_of_day() {
        let early = ClockTime::parse("05:30").unwrap();
        let late = ClockTime::parse("22:10:00").unwrap();
        assert!(early < late);
    }

    #[test]
    fn raw_comparison_puts_missing_last() {
        assert_eq!(compare_raw_times("09:00", "10:00"), Ordering::Less);
        assert_eq!(compare_raw_times("", "10:00"), Ordering::Greater);
        assert_eq!(compare_raw_times("23:59:00", "Source"), Ordering::Less);
        assert_eq!(compare_raw_times("", "Source"), Ordering::Equal);
    }

    #[test]
    fn mixed_precision_compares_by_value() {
        assert_eq!(compare_raw_times("10:00", "10:00:00"), Ordering::Equal);
        assert_eq!(compare_raw_times("10:00:01", "10:00"), Ordering::Greater);
    }
}
