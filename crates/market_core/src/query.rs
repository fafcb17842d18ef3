//! Named queries and their PostgREST form.
//!
//! A [`QueryKey`] identifies a query by its semantic parameters and is what
//! the per-view caches are keyed on. [`EditionFilter`] carries the filters a
//! source must apply, and [`RestRequest`] renders either into the table path
//! and query pairs the HTTP clients send.

use std::fmt;

use chrono::NaiveDate;

use crate::dates::{parse_day, DateWindow};
use crate::model::{EditionRow, RecordId};

pub const EDITIONS_TABLE: &str = "market_editions";
pub const PLACES_TABLE: &str = "places";

const SUMMARY_SELECT: &str =
    "id,name,start_date,end_date,is_active,place_id,market:markets!market_id(name,description)";
const ACTIVE_SELECT: &str = "*,market:markets!market_id(name,description)";
const DETAIL_SELECT: &str = "id,name,start_date,end_date,is_active,\
market:markets!market_id(name,description),\
market_edition_makers!market_edition_id(maker:makers(id,name,description,website,social_media))";
const PLACES_SELECT: &str = "id,name,is_active,latitude,longitude";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// Active editions that have not ended yet, as of the given day.
    ActiveEditions { today: NaiveDate },
    Detail(RecordId),
    Calendar,
    List,
    Map(DateWindow),
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ActiveEditions { today } => write!(f, "marketEditions/active/{today}"),
            Self::Detail(id) => write!(f, "market-details/{id}"),
            Self::Calendar => f.write_str("markets-calendar"),
            Self::List => f.write_str("markets-list"),
            Self::Map(window) => write!(f, "markets/{}/{}", window.start(), window.end()),
        }
    }
}

/// Row filters for edition queries. Active-only by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditionFilter {
    pub active_only: bool,
    pub starts_within: Option<DateWindow>,
    pub ends_on_or_after: Option<NaiveDate>,
    pub order_by_start: bool,
}

impl Default for EditionFilter {
    fn default() -> Self {
        Self {
            active_only: true,
            starts_within: None,
            ends_on_or_after: None,
            order_by_start: false,
        }
    }
}

impl EditionFilter {
    pub fn active() -> Self {
        Self::default()
    }

    pub fn starting_within(window: DateWindow) -> Self {
        Self {
            starts_within: Some(window),
            ..Self::default()
        }
    }

    pub fn not_ended(today: NaiveDate) -> Self {
        Self {
            ends_on_or_after: Some(today),
            order_by_start: true,
            ..Self::default()
        }
    }

    /// In-process evaluation, for sources that hold rows in memory.
    pub fn matches(&self, row: &EditionRow) -> bool {
        if self.active_only && !row.is_active {
            return false;
        }
        if let Some(window) = self.starts_within {
            if !parse_day(&row.start_date).is_some_and(|start| window.contains(start)) {
                return false;
            }
        }
        if let Some(today) = self.ends_on_or_after {
            if !parse_day(&row.end_date).is_some_and(|end| end >= today) {
                return false;
            }
        }
        true
    }

    /// Filters and orders rows the way the backend would.
    pub fn apply(&self, rows: &[EditionRow]) -> Vec<EditionRow> {
        let mut selected: Vec<EditionRow> =
            rows.iter().filter(|row| self.matches(row)).cloned().collect();
        if self.order_by_start {
            selected.sort_by_key(|row| parse_day(&row.start_date));
        }
        selected
    }
}

/// Which relations to embed alongside edition columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Embed {
    /// Summary columns with the owning market.
    Market,
    /// Every column (including the legacy `location`) with the owning market.
    AllColumns,
}

/// A read against one PostgREST table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestRequest {
    pub table: &'static str,
    pub params: Vec<(String, String)>,
}

impl RestRequest {
    fn new(table: &'static str, select: &str) -> Self {
        Self {
            table,
            params: vec![("select".to_string(), select.to_string())],
        }
    }

    fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.push((key.to_string(), value.into()));
        self
    }

    pub fn editions(filter: &EditionFilter, embed: Embed) -> Self {
        let select = match embed {
            Embed::Market => SUMMARY_SELECT,
            Embed::AllColumns => ACTIVE_SELECT,
        };
        let mut request = Self::new(EDITIONS_TABLE, select);
        if filter.active_only {
            request = request.param("is_active", "eq.true");
        }
        if let Some(window) = filter.starts_within {
            request = request
                .param("start_date", format!("gte.{}", window.start()))
                .param("start_date", format!("lte.{}", window.end()));
        }
        if let Some(today) = filter.ends_on_or_after {
            request = request.param("end_date", format!("gte.{today}"));
        }
        if filter.order_by_start {
            request = request.param("order", "start_date.asc");
        }
        request
    }

    pub fn edition_detail(id: &RecordId) -> Self {
        Self::new(EDITIONS_TABLE, DETAIL_SELECT)
            .param("id", format!("eq.{id}"))
            .param("limit", "1")
    }

    pub fn active_places() -> Self {
        Self::new(PLACES_TABLE, PLACES_SELECT).param("is_active", "eq.true")
    }

    /// Endpoint for this request under the backend base url.
    pub fn endpoint(&self, base_url: &str) -> String {
        format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(value: &str) -> NaiveDate {
        parse_day(value).unwrap()
    }

    fn row(id: i64, start: &str, end: &str, active: bool) -> EditionRow {
        EditionRow {
            id: RecordId::from(id),
            market_id: None,
            name: format!("Edition {id}"),
            start_date: start.to_string(),
            end_date: end.to_string(),
            is_active: active,
            place_id: None,
            location: None,
            market: None,
            market_edition_makers: Vec::new(),
        }
    }

    fn param<'a>(request: &'a RestRequest, key: &str) -> Vec<&'a str> {
        request
            .params
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    #[test]
    fn date_window_filter_is_inclusive_on_start_date() {
        let filter =
            EditionFilter::starting_within(DateWindow::new(day("2025-01-01"), day("2025-01-31")));
        let rows = vec![
            row(1, "2024-12-31", "2025-01-02", true),
            row(2, "2025-01-15", "2025-01-15", true),
            row(3, "2025-02-01", "2025-02-02", true),
        ];

        let selected = filter.apply(&rows);

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].start_date, "2025-01-15");
    }

    #[test]
    fn inactive_rows_are_excluded_by_default() {
        let rows = vec![row(1, "2025-01-15", "2025-01-15", false)];
        assert!(EditionFilter::active().apply(&rows).is_empty());

        let everything = EditionFilter {
            active_only: false,
            ..EditionFilter::default()
        };
        assert_eq!(everything.apply(&rows).len(), 1);
    }

    #[test]
    fn not_ended_filter_orders_by_start() {
        let rows = vec![
            row(1, "2025-03-01", "2025-03-02", true),
            row(2, "2024-12-01", "2024-12-02", true),
            row(3, "2025-01-20", "2025-01-21", true),
        ];

        let selected = EditionFilter::not_ended(day("2025-01-01")).apply(&rows);
        let ids: Vec<&str> = selected.iter().map(|row| row.id.as_str()).collect();

        assert_eq!(ids, vec!["3", "1"]);
    }

    #[test]
    fn map_request_carries_both_bounds() {
        let window = DateWindow::new(day("2025-01-01"), day("2025-01-31"));
        let request = RestRequest::editions(&EditionFilter::starting_within(window), Embed::Market);

        assert_eq!(request.table, EDITIONS_TABLE);
        assert_eq!(param(&request, "is_active"), vec!["eq.true"]);
        assert_eq!(
            param(&request, "start_date"),
            vec!["gte.2025-01-01", "lte.2025-01-31"]
        );
        assert!(param(&request, "select")[0].contains("market:markets!market_id"));
    }

    #[test]
    fn detail_request_embeds_makers() {
        let request = RestRequest::edition_detail(&RecordId::from(12));

        assert_eq!(param(&request, "id"), vec!["eq.12"]);
        assert_eq!(param(&request, "limit"), vec!["1"]);
        assert!(param(&request, "select")[0].contains("maker:makers("));
        assert_eq!(
            request.endpoint("https://demo.supabase.co/"),
            "https://demo.supabase.co/rest/v1/market_editions"
        );
    }

    #[test]
    fn keys_differ_when_window_changes() {
        let first = QueryKey::Map(DateWindow::starting(day("2025-01-01")));
        let second = QueryKey::Map(DateWindow::starting(day("2025-01-01")).shift_end(1));

        assert_ne!(first, second);
        assert_eq!(first.to_string(), "markets/2025-01-01/2025-01-31");
    }
}
