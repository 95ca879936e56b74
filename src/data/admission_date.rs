//! Admission dates arrive as free-form strings from the student service, usually
//! `YYYY-MM-DD` but sometimes with a time suffix attached (`2024-09-01T00:00:00.000Z`).

use jiff::civil::Date;
use std::cmp::Ordering;

pub fn parse(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    let date_part = raw.split(['T', ' ']).next().unwrap_or(raw);
    date_part.parse().ok()
}

/// Value for an `<input type="date">`, which only accepts `YYYY-MM-DD`.
pub fn input_value(raw: &str) -> String {
    parse(raw).map_or_else(|| raw.to_string(), |date| date.to_string())
}

pub fn display(raw: &str) -> String {
    parse(raw).map_or_else(
        || raw.to_string(),
        |date| date.strftime("%d %b %Y").to_string(),
    )
}

/// Chronological where both sides parse, otherwise parseable dates first and then raw text.
pub fn compare(a: &str, b: &str) -> Ordering {
    match (parse(a), parse(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    #[test]
    fn parses_plain_and_timestamped_dates() {
        assert_eq!(parse("2024-09-01"), Some(date(2024, 9, 1)));
        assert_eq!(parse("2024-09-01T00:00:00.000Z"), Some(date(2024, 9, 1)));
        assert_eq!(parse(" 2024-09-01 10:00"), Some(date(2024, 9, 1)));
        assert_eq!(parse("last tuesday"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn input_value_strips_time_but_keeps_garbage() {
        assert_eq!(input_value("2023-01-05T00:00:00.000Z"), "2023-01-05");
        assert_eq!(input_value("soon"), "soon");
    }

    #[test]
    fn display_is_human_readable() {
        assert_eq!(display("2023-01-05"), "05 Jan 2023");
        assert_eq!(display(""), "");
    }

    #[test]
    fn unparseable_dates_sort_last() {
        assert_eq!(compare("2023-01-05", "2022-12-31"), Ordering::Greater);
        assert_eq!(compare("2023-01-05", "unknown"), Ordering::Less);
        assert_eq!(compare("", "2023-01-05"), Ordering::Greater);
        assert_eq!(compare("a", "b"), Ordering::Less);
    }
}
