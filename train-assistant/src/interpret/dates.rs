//! Natural-language date phrases.
//!
//! Handles the phrasings travellers actually type: relative days
//! ("tomorrow"), weekdays ("next friday"), numeric dates (day first, as in
//! Indian usage) and day/month names ("12th March 2025", "Mar 12").
//! Phrases without a year take the year of the reference date.

use std::ops::Range;

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Longest date phrase, in meaningful tokens ("day after tomorrow").
const MAX_DATE_TOKENS: usize = 3;

/// Words skipped anywhere in a phrase ("the 12th of March").
const FILLERS: [&str; 2] = ["the", "of"];

/// Parse a date phrase relative to `today`.
///
/// Trailing words that are not part of a date are dropped one at a time
/// until a prefix parses, so "12 March please" still yields 12 March.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use train_assistant::interpret::parse_date;
///
/// let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
/// assert_eq!(parse_date("12 March", today), NaiveDate::from_ymd_opt(2025, 3, 12));
/// assert_eq!(parse_date("the 12th of March", today), NaiveDate::from_ymd_opt(2025, 3, 12));
/// assert_eq!(parse_date("tomorrow", today), NaiveDate::from_ymd_opt(2025, 3, 2));
/// assert_eq!(parse_date("2025-04-01", today), NaiveDate::from_ymd_opt(2025, 4, 1));
/// assert_eq!(parse_date("someday", today), None);
/// ```
pub fn parse_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    leading_date(text, today).map(|(_, date)| date)
}

/// Byte length of the date phrase `text` starts with, if any.
///
/// Only the shape of the phrase is checked; "29 February" is accepted even
/// though it is only valid in leap years.
pub(crate) fn date_phrase_len(text: &str) -> Option<usize> {
    let reference = NaiveDate::from_ymd_opt(2024, 1, 1)?;
    leading_date(text, reference).map(|(len, _)| len)
}

/// Byte range of the first date phrase anywhere in `text`.
pub(crate) fn find_date_phrase(text: &str) -> Option<Range<usize>> {
    tokens(text).iter().find_map(|token| {
        date_phrase_len(&text[token.start..]).map(|len| token.start..token.start + len)
    })
}

/// Longest parseable prefix of `text`: its byte length and the date.
fn leading_date(text: &str, today: NaiveDate) -> Option<(usize, NaiveDate)> {
    let tokens = tokens(text);
    let words: Vec<&str> = tokens.iter().map(|t| t.word.as_str()).collect();

    (1..=words.len().min(MAX_DATE_TOKENS))
        .rev()
        .find_map(|end| parse_tokens(&words[..end], today).map(|date| (tokens[end - 1].end, date)))
}

/// A lowercased word and where it sits in the input.
struct Token {
    start: usize,
    end: usize,
    word: String,
}

/// Split on whitespace and commas, trimming sentence punctuation and
/// dropping filler words.
fn tokens(text: &str) -> Vec<Token> {
    let is_break = |c: char| c.is_whitespace() || c == ',';
    let is_punct = |c: char| matches!(c, '.' | '?' | '!');

    let mut out = Vec::new();
    let mut rest = text;
    while let Some(skip) = rest.find(|c: char| !is_break(c)) {
        let from = text.len() - rest.len() + skip;
        let raw = &text[from..];
        let raw = &raw[..raw.find(is_break).unwrap_or(raw.len())];
        rest = &text[from + raw.len()..];

        let lead = raw.len() - raw.trim_start_matches(is_punct).len();
        let trimmed = raw.trim_matches(is_punct);
        if trimmed.is_empty() {
            continue;
        }

        let word = trimmed.to_lowercase();
        if FILLERS.contains(&word.as_str()) {
            continue;
        }

        let start = from + lead;
        out.push(Token {
            start,
            end: start + trimmed.len(),
            word,
        });
    }
    out
}

fn parse_tokens(tokens: &[&str], today: NaiveDate) -> Option<NaiveDate> {
    match tokens {
        ["today"] => Some(today),
        ["tomorrow"] => today.succ_opt(),
        ["yesterday"] => today.pred_opt(),
        ["day", "after", "tomorrow"] => today.checked_add_days(Days::new(2)),
        ["next", name] => weekday(name).map(|wd| upcoming(today, wd, true)),
        ["this", name] => weekday(name).map(|wd| upcoming(today, wd, false)),
        [single] => match weekday(single) {
            Some(wd) => Some(upcoming(today, wd, false)),
            None => numeric(single, today.year()),
        },
        [a, b] => day_and_month(a, b, today.year()).or_else(|| day_and_month(b, a, today.year())),
        [a, b, year] => {
            let year = parse_year(year)?;
            day_and_month(a, b, year).or_else(|| day_and_month(b, a, year))
        }
        _ => None,
    }
}

/// Next date falling on `target`, counting today unless `strictly_after`.
fn upcoming(today: NaiveDate, target: Weekday, strictly_after: bool) -> NaiveDate {
    let from = today.weekday().num_days_from_monday();
    let to = target.num_days_from_monday();
    let mut ahead = (to + 7 - from) % 7;
    if ahead == 0 && strictly_after {
        ahead = 7;
    }
    today + Days::new(u64::from(ahead))
}

fn weekday(token: &str) -> Option<Weekday> {
    let wd = match token {
        "monday" | "mon" => Weekday::Mon,
        "tuesday" | "tue" | "tues" => Weekday::Tue,
        "wednesday" | "wed" => Weekday::Wed,
        "thursday" | "thu" | "thurs" => Weekday::Thu,
        "friday" | "fri" => Weekday::Fri,
        "saturday" | "sat" => Weekday::Sat,
        "sunday" | "sun" => Weekday::Sun,
        _ => return None,
    };
    Some(wd)
}

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Month number for a full or abbreviated (3+ letter) month name.
fn month(token: &str) -> Option<u32> {
    if token.len() < 3 {
        return None;
    }
    if token == "sept" {
        return Some(9);
    }
    MONTHS
        .iter()
        .position(|name| name.starts_with(token))
        .map(|idx| idx as u32 + 1)
}

/// Day of month, with an optional ordinal suffix ("12th").
fn day(token: &str) -> Option<u32> {
    let digits = ["st", "nd", "rd", "th"]
        .iter()
        .find_map(|suffix| token.strip_suffix(suffix))
        .unwrap_or(token);
    if digits.is_empty() || digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|d| (1..=31).contains(d))
}

fn parse_year(token: &str) -> Option<i32> {
    if token.len() != 4 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

fn day_and_month(day_token: &str, month_token: &str, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month(month_token)?, day(day_token)?)
}

/// `YYYY-MM-DD`, `DD/MM/YYYY`, `DD-MM-YY`, `DD.MM` and friends.
fn numeric(token: &str, default_year: i32) -> Option<NaiveDate> {
    let parts: Vec<&str> = token.split(['/', '-', '.']).collect();
    if parts
        .iter()
        .any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }

    let num = |s: &str| s.parse::<u32>().ok();

    match parts[..] {
        [y, m, d] if y.len() == 4 => {
            NaiveDate::from_ymd_opt(y.parse().ok()?, num(m)?, num(d)?)
        }
        [d, m, y] if y.len() == 4 => {
            NaiveDate::from_ymd_opt(y.parse().ok()?, num(m)?, num(d)?)
        }
        [d, m, y] if y.len() == 2 => {
            NaiveDate::from_ymd_opt(2000 + y.parse::<i32>().ok()?, num(m)?, num(d)?)
        }
        [d, m] if d.len() <= 2 && m.len() <= 2 => {
            NaiveDate::from_ymd_opt(default_year, num(m)?, num(d)?)
        }
        _ => None,
    }
}
