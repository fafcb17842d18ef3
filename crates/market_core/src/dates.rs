//! Calendar-day helpers: parsing backend dates, the map's date window and the
//! upcoming/past split used by the list view.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Parses a backend date. Accepts plain `YYYY-MM-DD` as well as timestamps,
/// in which case only the calendar day is kept.
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.date_naive());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|timestamp| timestamp.date())
        .ok()
}

/// `January 15th, 2025`.
pub fn format_long(date: NaiveDate) -> String {
    format!(
        "{} {}{}, {}",
        date.format("%B"),
        date.day(),
        ordinal_suffix(date.day()),
        date.year()
    )
}

/// Long form of a raw backend date, falling back to the raw text.
pub fn format_long_raw(value: &str) -> String {
    parse_day(value).map_or_else(|| value.to_string(), format_long)
}

const fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Inclusive range of calendar days used to filter editions by start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub const DEFAULT_SPAN_DAYS: u64 = 30;

    /// Builds a window; an end before the start is pulled up to the start.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// `today ..= today + 30 days`.
    pub fn starting(today: NaiveDate) -> Self {
        let end = today
            .checked_add_days(Days::new(Self::DEFAULT_SPAN_DAYS))
            .unwrap_or(NaiveDate::MAX);
        Self::new(today, end)
    }

    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Moves the start bound. The end follows when it would fall behind.
    pub fn with_start(self, start: NaiveDate) -> Self {
        Self::new(start, self.end)
    }

    /// Moves the end bound, never before the start.
    pub fn with_end(self, end: NaiveDate) -> Self {
        Self::new(self.start, end)
    }

    pub fn shift_start(self, days: i64) -> Self {
        self.with_start(shift(self.start, days))
    }

    pub fn shift_end(self, days: i64) -> Self {
        self.with_end(shift(self.end, days))
    }
}

fn shift(date: NaiveDate, days: i64) -> NaiveDate {
    let magnitude = Days::new(days.unsigned_abs());
    let moved = if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    };
    moved.unwrap_or(date)
}

/// Which side of "today" an edition starts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Upcoming,
    Past,
}

/// Classifies a start day against today. Editions starting today are upcoming.
pub fn classify(start: NaiveDate, today: NaiveDate) -> Period {
    if start >= today {
        Period::Upcoming
    } else {
        Period::Past
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Partitioned<T> {
    pub upcoming: Vec<T>,
    pub past: Vec<T>,
}

impl<T> Default for Partitioned<T> {
    fn default() -> Self {
        Self {
            upcoming: Vec::new(),
            past: Vec::new(),
        }
    }
}

/// Splits items into upcoming and past by their start day. Items whose start
/// day cannot be read belong to neither side.
pub fn partition_by_start<T, F>(items: &[T], today: NaiveDate, start_of: F) -> Partitioned<T>
where
    T: Clone,
    F: Fn(&T) -> Option<NaiveDate>,
{
    let mut partitioned = Partitioned::default();
    for item in items {
        match start_of(item).map(|start| classify(start, today)) {
            Some(Period::Upcoming) => partitioned.upcoming.push(item.clone()),
            Some(Period::Past) => partitioned.past.push(item.clone()),
            None => tracing::warn!("skipping item with unreadable start date"),
        }
    }
    partitioned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(value: &str) -> NaiveDate {
        parse_day(value).unwrap()
    }

    #[test]
    fn parses_dates_and_timestamps() {
        assert_eq!(parse_day("2025-01-15"), NaiveDate::from_ymd_opt(2025, 1, 15));
        assert_eq!(
            parse_day("2025-01-15T10:30:00+00:00"),
            NaiveDate::from_ymd_opt(2025, 1, 15)
        );
        assert_eq!(
            parse_day("2025-01-15T10:30:00.123"),
            NaiveDate::from_ymd_opt(2025, 1, 15)
        );
        assert_eq!(parse_day("soon"), None);
        assert_eq!(parse_day(""), None);
    }

    #[test]
    fn long_format_uses_ordinals() {
        assert_eq!(format_long(day("2025-01-01")), "January 1st, 2025");
        assert_eq!(format_long(day("2025-03-22")), "March 22nd, 2025");
        assert_eq!(format_long(day("2025-05-13")), "May 13th, 2025");
        assert_eq!(format_long(day("2025-06-23")), "June 23rd, 2025");
        assert_eq!(format_long_raw("not a date"), "not a date");
    }

    #[test]
    fn default_window_spans_thirty_days() {
        let window = DateWindow::starting(day("2025-01-01"));
        assert_eq!(window.start(), day("2025-01-01"));
        assert_eq!(window.end(), day("2025-01-31"));
    }

    #[test]
    fn window_is_inclusive_on_both_ends() {
        let window = DateWindow::new(day("2025-01-01"), day("2025-01-31"));

        assert!(!window.contains(day("2024-12-31")));
        assert!(window.contains(day("2025-01-01")));
        assert!(window.contains(day("2025-01-15")));
        assert!(window.contains(day("2025-01-31")));
        assert!(!window.contains(day("2025-02-01")));
    }

    #[test]
    fn end_never_precedes_start() {
        let window = DateWindow::new(day("2025-01-10"), day("2025-01-01"));
        assert_eq!(window.end(), day("2025-01-10"));

        let moved = DateWindow::starting(day("2025-01-01")).with_start(day("2025-03-01"));
        assert_eq!(moved.end(), day("2025-03-01"));

        let shrunk = DateWindow::starting(day("2025-01-01")).shift_end(-60);
        assert_eq!(shrunk.end(), day("2025-01-01"));
    }

    #[test]
    fn partitions_around_today() {
        let starts = vec!["2024-01-01".to_string(), "2025-06-01".to_string()];
        let split = partition_by_start(&starts, day("2025-01-01"), |s| parse_day(s));

        assert_eq!(split.past, vec!["2024-01-01".to_string()]);
        assert_eq!(split.upcoming, vec!["2025-06-01".to_string()]);
    }

    #[test]
    fn today_counts_as_upcoming_and_garbage_is_dropped() {
        let starts = vec!["2025-01-01".to_string(), "whenever".to_string()];
        let split = partition_by_start(&starts, day("2025-01-01"), |s| parse_day(s));

        assert_eq!(split.upcoming.len(), 1);
        assert!(split.past.is_empty());
    }
}
