//! Entity span extraction.
//!
//! Only slices text. Turning spans into codes and dates is the job of the
//! station resolver and the date parser.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::dates::{date_phrase_len, find_date_phrase};

/// "from <span>", bounded by "to", "on", a relative day, punctuation or end.
static SOURCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bfrom\s+([\w\s]+?)(?:\s+(?:to|on|today|tomorrow|day\s+after)\b|[^\w\s]|$)",
    )
    .expect("source pattern is valid")
});

/// "to <span>", bounded by "on", "from", a relative day, punctuation or end.
static DESTINATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bto\s+([\w\s]+?)(?:\s+(?:on|from|today|tomorrow|day\s+after)\b|[^\w\s]|$)",
    )
    .expect("destination pattern is valid")
});

/// "on <span>" through the end of the sentence; narrowed to the date
/// phrase it starts with.
static DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bon\s+([\w\s,/.-]+)").expect("date pattern is valid")
});

/// Shortest digit run accepted as a train number.
const MIN_TRAIN_NO_DIGITS: usize = 3;

/// Raw entity spans found in a query. Each is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntities {
    pub source: Option<String>,
    pub destination: Option<String>,
    pub date: Option<String>,
    pub train_no: Option<String>,
}

/// Slice entity spans out of a query.
///
/// # Examples
///
/// ```
/// use train_assistant::interpret::extract;
///
/// let spans = extract("show trains from Chennai to New Delhi on 12 March");
/// assert_eq!(spans.source.as_deref(), Some("Chennai"));
/// assert_eq!(spans.destination.as_deref(), Some("New Delhi"));
/// assert_eq!(spans.date.as_deref(), Some("12 March"));
/// assert_eq!(spans.train_no, None);
/// ```
pub fn extract(text: &str) -> RawEntities {
    let date = find_date(text);
    let date_range = date.as_ref().map(|(_, span)| span.clone());

    let source = capture(&SOURCE, text, 0);
    let destination = find_destination(text, source.as_ref().map(|(_, span)| span.clone()));
    let source = source.and_then(|found| stop_before(text, found, date_range.as_ref()));
    let destination = destination.and_then(|found| stop_before(text, found, date_range.as_ref()));

    let train_no = find_train_no(text, date_range);

    RawEntities {
        source: source.map(|(s, _)| s),
        destination: destination.map(|(s, _)| s),
        date: date.map(|(s, _)| s),
        train_no,
    }
}

/// First non-empty capture at or after `start`, with its byte range.
fn capture(pattern: &Regex, text: &str, start: usize) -> Option<(String, Range<usize>)> {
    pattern
        .captures_iter(&text[start..])
        .filter_map(|caps| caps.get(1))
        .map(|m| (m.start() + start)..(m.end() + start))
        .find_map(|range| clean_span(&text[range.clone()]).map(|s| (s, range)))
}

/// Destination span, preferring one after the source span.
fn find_destination(text: &str, source: Option<Range<usize>>) -> Option<(String, Range<usize>)> {
    if let Some(source) = &source
        && let Some(found) = capture_at(&DESTINATION, text, source.end)
    {
        return Some(found);
    }

    DESTINATION
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.range())
        .filter(|range| {
            source
                .as_ref()
                .is_none_or(|src| range.end <= src.start || range.start >= src.end)
        })
        .find_map(|range| clean_span(&text[range.clone()]).map(|s| (s, range)))
}

/// Like [`capture`], but keeps the text before `start` as context for `\b`.
fn capture_at(pattern: &Regex, text: &str, start: usize) -> Option<(String, Range<usize>)> {
    let caps = pattern.captures_at(text, start)?;
    let m = caps.get(1)?;
    clean_span(m.as_str()).map(|s| (s, m.range()))
}

/// Date span: the first "on <span>" that starts with a date phrase,
/// otherwise the first date phrase anywhere ("12 March 2025", "tomorrow").
fn find_date(text: &str) -> Option<(String, Range<usize>)> {
    let mut at = 0;
    while let Some(caps) = DATE.captures_at(text, at) {
        let (Some(whole), Some(span)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        if let Some(len) = date_phrase_len(span.as_str()) {
            let range = span.start()..span.start() + len;
            if let Some(found) = clean_span(&text[range.clone()]) {
                return Some((found, range));
            }
        }
        // Past "on"; the next match may start inside this span.
        at = whole.start() + 2;
    }

    let range = find_date_phrase(text)?;
    clean_span(&text[range.clone()]).map(|s| (s, range))
}

/// Cut a station span where the date span begins inside it.
fn stop_before(
    text: &str,
    (span, range): (String, Range<usize>),
    date: Option<&Range<usize>>,
) -> Option<(String, Range<usize>)> {
    match date {
        Some(d) if d.start < range.end && d.end > range.start => {
            let kept = range.start..d.start.max(range.start);
            clean_span(&text[kept.clone()]).map(|s| (s, kept))
        }
        _ => Some((span, range)),
    }
}

/// First standalone digit-only token outside the date span.
fn find_train_no(text: &str, date: Option<Range<usize>>) -> Option<String> {
    let mut offset = 0;
    for token in text.split_whitespace() {
        // split_whitespace yields in order; recover each token's position.
        let start = offset + text[offset..].find(token)?;
        let end = start + token.len();
        offset = end;

        if date
            .as_ref()
            .is_some_and(|d| start < d.end && end > d.start)
        {
            continue;
        }

        let digits = token.trim_matches(|c: char| !c.is_alphanumeric());
        if digits.len() >= MIN_TRAIN_NO_DIGITS && digits.bytes().all(|b| b.is_ascii_digit()) {
            return Some(digits.to_string());
        }
    }
    None
}

/// Collapse internal whitespace and strip trailing punctuation.
fn clean_span(span: &str) -> Option<String> {
    let joined = span.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = joined.trim_end_matches(['.', ',', '?', '!']).trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_query() {
        let spans = extract("Show me trains from Chennai Central to New Delhi on 12 March 2025");
        assert_eq!(spans.source.as_deref(), Some("Chennai Central"));
        assert_eq!(spans.destination.as_deref(), Some("New Delhi"));
        assert_eq!(spans.date.as_deref(), Some("12 March 2025"));
        assert_eq!(spans.train_no, None);
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let spans = extract("TRAINS FROM PUNE TO MUMBAI ON MONDAY");
        assert_eq!(spans.source.as_deref(), Some("PUNE"));
        assert_eq!(spans.destination.as_deref(), Some("MUMBAI"));
        assert_eq!(spans.date.as_deref(), Some("MONDAY"));
    }

    #[test]
    fn keywords_match_whole_words_only() {
        // "London" contains "on", "Toronto" contains "to".
        let spans = extract("trains from London to Toronto");
        assert_eq!(spans.source.as_deref(), Some("London"));
        assert_eq!(spans.destination.as_deref(), Some("Toronto"));
        assert_eq!(spans.date, None);
    }

    #[test]
    fn destination_before_source() {
        let spans = extract("train to Howrah from Patna tomorrow");
        assert_eq!(spans.destination.as_deref(), Some("Howrah"));
        assert_eq!(spans.source.as_deref(), Some("Patna"));
        assert_eq!(spans.date.as_deref(), Some("tomorrow"));
    }

    #[test]
    fn destination_prefers_span_after_source() {
        let spans = extract("I want to go from Agra to Jaipur");
        assert_eq!(spans.source.as_deref(), Some("Agra"));
        assert_eq!(spans.destination.as_deref(), Some("Jaipur"));
    }

    #[test]
    fn trailing_punctuation_ends_spans() {
        let spans = extract("Any trains from Goa to Pune?");
        assert_eq!(spans.source.as_deref(), Some("Goa"));
        assert_eq!(spans.destination.as_deref(), Some("Pune"));
    }

    #[test]
    fn missing_entities_are_absent() {
        assert_eq!(extract("hello there"), RawEntities::default());
        assert_eq!(extract(""), RawEntities::default());

        let spans = extract("trains to Delhi");
        assert_eq!(spans.source, None);
        assert_eq!(spans.destination.as_deref(), Some("Delhi"));
    }

    #[test]
    fn numeric_date_span() {
        let spans = extract("trains from A to B on 12/03/2025.");
        assert_eq!(spans.date.as_deref(), Some("12/03/2025"));
        assert_eq!(spans.train_no, None);
    }

    #[test]
    fn relative_day_without_on() {
        let spans = extract("trains from Surat to Vapi day after tomorrow");
        assert_eq!(spans.source.as_deref(), Some("Surat"));
        assert_eq!(spans.destination.as_deref(), Some("Vapi"));
        assert_eq!(spans.date.as_deref(), Some("day after tomorrow"));
    }

    #[test]
    fn train_number_token() {
        let spans = extract("running status of 12621 please");
        assert_eq!(spans.train_no.as_deref(), Some("12621"));

        let spans = extract("check seat in train #12951?");
        assert_eq!(spans.train_no.as_deref(), Some("12951"));
    }

    #[test]
    fn train_number_ignores_short_and_mixed_tokens() {
        assert_eq!(extract("platform 12").train_no, None);
        assert_eq!(extract("coach 12A4").train_no, None);
    }

    #[test]
    fn train_number_outside_date_span() {
        let spans = extract("seats in 12433 on 5 March 2025");
        assert_eq!(spans.train_no.as_deref(), Some("12433"));
        assert_eq!(spans.date.as_deref(), Some("5 March 2025"));

        assert_eq!(extract("trains on 12 March 2025").train_no, None);
    }

    #[test]
    fn date_span_stops_where_the_date_does() {
        let spans = extract("seat availability on 12 March for train 12951");
        assert_eq!(spans.date.as_deref(), Some("12 March"));
        assert_eq!(spans.train_no.as_deref(), Some("12951"));
    }

    #[test]
    fn later_on_is_tried_when_first_is_not_a_date() {
        let spans = extract("check seats available on train 12951 on 5 March");
        assert_eq!(spans.date.as_deref(), Some("5 March"));
        assert_eq!(spans.train_no.as_deref(), Some("12951"));
    }

    #[test]
    fn date_without_on() {
        let spans = extract("show me trains from Chennai Central to New Delhi 12 March 2025");
        assert_eq!(spans.source.as_deref(), Some("Chennai Central"));
        assert_eq!(spans.destination.as_deref(), Some("New Delhi"));
        assert_eq!(spans.date.as_deref(), Some("12 March 2025"));
        assert_eq!(spans.train_no, None);

        let spans = extract("trains from Pune 5/4 to Goa");
        assert_eq!(spans.source.as_deref(), Some("Pune"));
        assert_eq!(spans.date.as_deref(), Some("5/4"));
    }

    #[test]
    fn date_with_filler_words() {
        let spans = extract("trains from Agra to Jaipur on the 12th of March");
        assert_eq!(spans.destination.as_deref(), Some("Jaipur"));
        assert_eq!(spans.date.as_deref(), Some("the 12th of March"));
    }
}
