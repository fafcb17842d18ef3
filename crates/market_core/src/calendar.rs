//! Month and week grids for the calendar view.

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::dates::format_long;
use crate::mapper::CalendarEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarMode {
    Month,
    Week,
}

/// Which stretch of days the calendar shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCursor {
    focus: NaiveDate,
    mode: CalendarMode,
}

impl CalendarCursor {
    pub const fn new(today: NaiveDate) -> Self {
        Self {
            focus: today,
            mode: CalendarMode::Month,
        }
    }

    pub const fn focus(&self) -> NaiveDate {
        self.focus
    }

    pub const fn mode(&self) -> CalendarMode {
        self.mode
    }

    pub const fn with_mode(self, mode: CalendarMode) -> Self {
        Self {
            focus: self.focus,
            mode,
        }
    }

    pub const fn toggle_mode(self) -> Self {
        match self.mode {
            CalendarMode::Month => self.with_mode(CalendarMode::Week),
            CalendarMode::Week => self.with_mode(CalendarMode::Month),
        }
    }

    pub fn next(self) -> Self {
        let focus = match self.mode {
            CalendarMode::Month => self.focus.checked_add_months(Months::new(1)),
            CalendarMode::Week => self.focus.checked_add_days(Days::new(7)),
        };
        Self {
            focus: focus.unwrap_or(self.focus),
            mode: self.mode,
        }
    }

    pub fn previous(self) -> Self {
        let focus = match self.mode {
            CalendarMode::Month => self.focus.checked_sub_months(Months::new(1)),
            CalendarMode::Week => self.focus.checked_sub_days(Days::new(7)),
        };
        Self {
            focus: focus.unwrap_or(self.focus),
            mode: self.mode,
        }
    }

    pub const fn today(self, today: NaiveDate) -> Self {
        Self {
            focus: today,
            mode: self.mode,
        }
    }

    pub fn title(&self) -> String {
        match self.mode {
            CalendarMode::Month => self.focus.format("%B %Y").to_string(),
            CalendarMode::Week => format!("Week of {}", format_long(week_start(self.focus))),
        }
    }

    /// Visible weeks, Sunday first.
    pub fn weeks(&self) -> Vec<[NaiveDate; 7]> {
        match self.mode {
            CalendarMode::Week => vec![week_of(self.focus)],
            CalendarMode::Month => {
                let first = self.focus.with_day(1).unwrap_or(self.focus);
                let last = first
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(first);

                let mut weeks = Vec::new();
                let mut start = week_start(first);
                while start <= last {
                    weeks.push(week_of(start));
                    match start.checked_add_days(Days::new(7)) {
                        Some(next) => start = next,
                        None => break,
                    }
                }
                weeks
            }
        }
    }

    pub fn in_focus_month(&self, day: NaiveDate) -> bool {
        day.year() == self.focus.year() && day.month() == self.focus.month()
    }
}

fn week_start(day: NaiveDate) -> NaiveDate {
    day.checked_sub_days(Days::new(u64::from(day.weekday().num_days_from_sunday())))
        .unwrap_or(day)
}

fn week_of(day: NaiveDate) -> [NaiveDate; 7] {
    let start = week_start(day);
    std::array::from_fn(|offset| {
        start
            .checked_add_days(Days::new(offset as u64))
            .unwrap_or(start)
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayCell<'a> {
    pub date: NaiveDate,
    pub in_focus_month: bool,
    pub events: Vec<&'a CalendarEvent>,
}

/// Lays events onto the visible weeks. Multi-day events appear on every day
/// they cover.
pub fn grid<'a>(cursor: &CalendarCursor, events: &'a [CalendarEvent]) -> Vec<Vec<DayCell<'a>>> {
    cursor
        .weeks()
        .into_iter()
        .map(|week| {
            week.into_iter()
                .map(|date| DayCell {
                    date,
                    in_focus_month: cursor.in_focus_month(date),
                    events: events.iter().filter(|event| event.covers(date)).collect(),
                })
                .collect()
        })
        .collect()
}

/// Events touching the visible range, in start order.
pub fn visible_events<'a>(
    cursor: &CalendarCursor,
    events: &'a [CalendarEvent],
) -> Vec<&'a CalendarEvent> {
    let weeks = cursor.weeks();
    let (Some(first), Some(last)) = (weeks.first(), weeks.last()) else {
        return Vec::new();
    };
    let (from, to) = (first[0], last[6]);

    let mut visible: Vec<&CalendarEvent> = events
        .iter()
        .filter(|event| match (event.starts_on(), event.ends_on()) {
            (Some(start), Some(end)) => start <= to && end >= from,
            _ => false,
        })
        .collect();
    visible.sort_by_key(|event| event.starts_on());
    visible
}
