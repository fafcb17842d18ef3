use chrono::{Local, NaiveDate};
use market_core::calendar::{visible_events, CalendarCursor};
use market_core::dates::partition_by_start;
use market_core::{
    CalendarEvent, DateWindow, DetailPane, EditionSummary, FetchJob, FetchOutcome, Load,
    MapMarker, Partitioned, QueryKey, QuerySlot, RecordId, Route, Selection, Viewport,
};
use throbber_widgets_tui::ThrobberState;

/// Source of "today" for partitioning and default windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    System,
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(self) -> NaiveDate {
        match self {
            Self::System => Local::now().date_naive(),
            Self::Fixed(day) => day,
        }
    }
}

/// The navigation shell: current route, the one open edition, and a query
/// slot per view.
pub struct App {
    pub running: bool,
    pub route: Route,
    pub show_help: bool,
    pub status_message: String,
    pub selection: Selection,
    pub list: QuerySlot<QueryKey, Vec<EditionSummary>>,
    pub calendar: QuerySlot<QueryKey, Vec<CalendarEvent>>,
    pub map: QuerySlot<QueryKey, Vec<MapMarker>>,
    pub map_window: DateWindow,
    pub viewport: Viewport,
    pub calendar_cursor: CalendarCursor,
    pub selected_list_index: usize,
    pub selected_marker_index: usize,
    pub selected_event_index: usize,
    pub detail_scroll: u16,
    pub throbber: ThrobberState,
    pub backend_label: String,
    clock: Clock,
    jobs: Vec<FetchJob>,
}

impl App {
    pub fn new(clock: Clock) -> Self {
        let today = clock.today();
        Self {
            running: true,
            route: Route::Map,
            show_help: false,
            status_message: String::new(),
            selection: Selection::new(),
            list: QuerySlot::new(),
            calendar: QuerySlot::new(),
            map: QuerySlot::new(),
            map_window: DateWindow::starting(today),
            viewport: Viewport::default(),
            calendar_cursor: CalendarCursor::new(today),
            selected_list_index: 0,
            selected_marker_index: 0,
            selected_event_index: 0,
            detail_scroll: 0,
            throbber: ThrobberState::default(),
            backend_label: String::new(),
            clock,
            jobs: Vec::new(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Fetches queued since the last call.
    pub fn take_jobs(&mut self) -> Vec<FetchJob> {
        std::mem::take(&mut self.jobs)
    }

    pub fn navigate(&mut self, route: Route) {
        if self.route != route {
            tracing::debug!(from = self.route.path(), to = route.path(), "navigating");
            self.route = route;
        }
        self.request_route_data();
    }

    /// Asks the current view's slot for its key; queues a fetch only when the
    /// slot has nothing usable.
    pub fn request_route_data(&mut self) {
        match self.route {
            Route::List => {
                if let Some(ticket) = self.list.request(QueryKey::List) {
                    self.jobs.push(FetchJob::List(ticket));
                }
            }
            Route::Calendar => {
                if let Some(ticket) = self.calendar.request(QueryKey::Calendar) {
                    self.jobs.push(FetchJob::Calendar(ticket));
                }
            }
            Route::Map => {
                let window = self.map_window;
                if let Some(ticket) = self.map.request(QueryKey::Map(window)) {
                    self.jobs.push(FetchJob::Map { ticket, window });
                }
            }
        }
    }

    /// Drops cached results for the current view and fetches again.
    pub fn reload(&mut self) {
        match self.route {
            Route::List => self.list.invalidate(),
            Route::Calendar => self.calendar.invalidate(),
            Route::Map => self.map.invalidate(),
        }
        self.status_message = format!("Refreshing {}", self.route.label());
        self.request_route_data();
    }

    pub fn open_edition(&mut self, id: RecordId) {
        if let Some(ticket) = self.selection.select(id) {
            self.detail_scroll = 0;
            self.jobs.push(FetchJob::Detail(ticket));
        }
    }

    pub fn close_detail(&mut self) {
        self.selection.close();
        self.detail_scroll = 0;
    }

    pub fn set_map_window(&mut self, window: DateWindow) {
        if window == self.map_window {
            return;
        }
        self.map_window = window;
        self.selected_marker_index = 0;
        if self.route == Route::Map {
            self.request_route_data();
        }
    }

    pub fn shift_window_start(&mut self, days: i64) {
        self.set_map_window(self.map_window.shift_start(days));
    }

    pub fn shift_window_end(&mut self, days: i64) {
        self.set_map_window(self.map_window.shift_end(days));
    }

    pub fn reset_window(&mut self) {
        self.set_map_window(DateWindow::starting(self.today()));
    }

    /// Applies a finished fetch. Returns whether anything visible changed.
    pub fn apply(&mut self, outcome: FetchOutcome) -> bool {
        match outcome {
            FetchOutcome::List(ticket, result) => {
                let changed = self.list.resolve(ticket, result);
                if changed {
                    self.selected_list_index = self
                        .selected_list_index
                        .min(self.list_rows().len().saturating_sub(1));
                }
                changed
            }
            FetchOutcome::Calendar(ticket, result) => {
                let changed = self.calendar.resolve(ticket, result);
                if changed {
                    self.clamp_event_index();
                }
                changed
            }
            FetchOutcome::Map(ticket, result) => {
                let changed = self.map.resolve(ticket, result);
                if changed {
                    self.selected_marker_index = self
                        .selected_marker_index
                        .min(self.markers().len().saturating_sub(1));
                }
                changed
            }
            FetchOutcome::Detail(ticket, result) => self.selection.resolve(ticket, result),
        }
    }

    pub fn is_loading(&self) -> bool {
        let slot_loading = match self.route {
            Route::List => self.list.state().is_loading(),
            Route::Calendar => self.calendar.state().is_loading(),
            Route::Map => self.map.state().is_loading(),
        };
        slot_loading || matches!(self.selection.pane(), DetailPane::Loading(_))
    }

    /// Advances the loading spinner.
    pub fn tick(&mut self) {
        if self.is_loading() {
            self.throbber.calc_next();
        }
    }

    pub fn markers(&self) -> &[MapMarker] {
        self.map.state().ready().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn selected_marker(&self) -> Option<&MapMarker> {
        self.markers().get(self.selected_marker_index)
    }

    /// Moves the marker highlight and recentres the map on it.
    pub fn select_marker(&mut self, index: usize) {
        let Some(location) = self.markers().get(index).map(|marker| marker.location) else {
            return;
        };
        self.selected_marker_index = index;
        self.viewport = self.viewport.center_on(location);
    }

    pub fn open_selected_marker(&mut self) {
        if let Some(id) = self.selected_marker().map(|marker| marker.id.clone()) {
            self.open_edition(id);
        }
    }

    /// Upcoming editions soonest first, past editions most recent first.
    pub fn list_sections(&self) -> Partitioned<EditionSummary> {
        let Some(editions) = self.list.state().ready() else {
            return Partitioned::default();
        };
        let mut sections = partition_by_start(editions, self.today(), EditionSummary::starts_on);
        sections.upcoming.sort_by_key(EditionSummary::starts_on);
        sections
            .past
            .sort_by_key(|edition| std::cmp::Reverse(edition.starts_on()));
        sections
    }

    /// Both list sections in display order, for cursor movement.
    pub fn list_rows(&self) -> Vec<EditionSummary> {
        let Partitioned { mut upcoming, past } = self.list_sections();
        upcoming.extend(past);
        upcoming
    }

    pub fn open_selected_list_row(&mut self) {
        if let Some(edition) = self.list_rows().get(self.selected_list_index) {
            self.open_edition(edition.id.clone());
        }
    }

    pub fn calendar_events(&self) -> &[CalendarEvent] {
        self.calendar.state().ready().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn visible_calendar_events(&self) -> Vec<&CalendarEvent> {
        visible_events(&self.calendar_cursor, self.calendar_events())
    }

    pub fn set_calendar_cursor(&mut self, cursor: CalendarCursor) {
        self.calendar_cursor = cursor;
        self.selected_event_index = 0;
    }

    pub fn open_selected_event(&mut self) {
        let id = self
            .visible_calendar_events()
            .get(self.selected_event_index)
            .map(|event| event.id.clone());
        if let Some(id) = id {
            self.open_edition(id);
        }
    }

    fn clamp_event_index(&mut self) {
        let visible = self.visible_calendar_events().len();
        self.selected_event_index = self.selected_event_index.min(visible.saturating_sub(1));
    }

    /// Message for the current view's failed query, if any.
    pub fn route_error(&self) -> Option<&str> {
        match self.route {
            Route::List => failure(self.list.state()),
            Route::Calendar => failure(self.calendar.state()),
            Route::Map => failure(self.map.state()),
        }
    }
}

fn failure<T>(state: &Load<T>) -> Option<&str> {
    match state {
        Load::Failed(message) => Some(message),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_core::dates::parse_day;
    use market_core::{Coordinates, MarketDetails, QueryError};

    fn day(value: &str) -> NaiveDate {
        parse_day(value).unwrap()
    }

    fn app() -> App {
        App::new(Clock::Fixed(day("2025-01-01")))
    }

    fn summary(id: i64, start: &str) -> EditionSummary {
        EditionSummary {
            id: RecordId::from(id),
            edition_name: format!("Edition {id}"),
            market_name: "Atwater".to_string(),
            description: None,
            start_date: start.to_string(),
            end_date: start.to_string(),
            is_active: true,
        }
    }

    fn marker(id: i64, latitude: f64, longitude: f64) -> MapMarker {
        MapMarker {
            id: RecordId::from(id),
            name: format!("Edition {id}"),
            market_name: "Jean-Talon".to_string(),
            description: None,
            location: Coordinates {
                latitude,
                longitude,
            },
            start_date: "2025-01-15".to_string(),
            end_date: "2025-01-15".to_string(),
        }
    }

    fn details(id: &str) -> MarketDetails {
        MarketDetails {
            id: RecordId::from(id),
            edition_name: format!("Edition {id}"),
            market_name: "Atwater".to_string(),
            description: None,
            start_date: "2025-01-15".to_string(),
            end_date: "2025-01-15".to_string(),
            makers: Vec::new(),
        }
    }

    #[test]
    fn default_window_spans_thirty_days() {
        let app = app();
        assert_eq!(app.map_window.start(), day("2025-01-01"));
        assert_eq!(app.map_window.end(), day("2025-01-31"));
    }

    #[test]
    fn revisiting_a_route_does_not_refetch() {
        let mut app = app();

        app.navigate(Route::List);
        let jobs = app.take_jobs();
        assert_eq!(jobs.len(), 1);

        app.navigate(Route::Map);
        app.navigate(Route::List);
        let jobs = app.take_jobs();
        assert!(jobs.iter().all(|job| matches!(job, FetchJob::Map { .. })));
    }

    #[test]
    fn window_change_queues_a_new_map_query() {
        let mut app = app();
        app.request_route_data();
        assert_eq!(app.take_jobs().len(), 1);

        app.shift_window_end(-10);
        let jobs = app.take_jobs();

        let [FetchJob::Map { window, .. }] = jobs.as_slice() else {
            panic!("expected one map job, got {jobs:?}");
        };
        assert_eq!(window.end(), day("2025-01-21"));
    }

    #[test]
    fn superseded_map_result_is_not_shown() {
        let mut app = app();
        app.request_route_data();
        let Some(FetchJob::Map { ticket: first, .. }) = app.take_jobs().pop() else {
            panic!("expected a map job");
        };
        app.shift_window_start(1);
        let Some(FetchJob::Map { ticket: second, .. }) = app.take_jobs().pop() else {
            panic!("expected a map job");
        };

        assert!(app.apply(FetchOutcome::Map(second, Ok(vec![marker(2, 45.5, -73.6)]))));
        assert!(!app.apply(FetchOutcome::Map(first, Ok(vec![marker(1, 45.5, -73.6)]))));

        assert_eq!(app.markers().len(), 1);
        assert_eq!(app.markers()[0].id, RecordId::from(2));
    }

    #[test]
    fn list_splits_on_today() {
        let mut app = app();
        app.navigate(Route::List);
        let Some(FetchJob::List(ticket)) = app.take_jobs().pop() else {
            panic!("expected a list job");
        };

        app.apply(FetchOutcome::List(
            ticket,
            Ok(vec![
                summary(1, "2024-01-01"),
                summary(2, "2025-06-01"),
                summary(3, "2025-01-01"),
                summary(4, "2024-06-01"),
            ]),
        ));

        let sections = app.list_sections();
        let upcoming: Vec<_> = sections.upcoming.iter().map(|e| e.id.to_string()).collect();
        let past: Vec<_> = sections.past.iter().map(|e| e.id.to_string()).collect();
        assert_eq!(upcoming, vec!["3", "2"]);
        assert_eq!(past, vec!["4", "1"]);
    }

    #[test]
    fn last_opened_edition_wins() {
        let mut app = app();
        app.open_edition(RecordId::from("A"));
        app.open_edition(RecordId::from("B"));
        let jobs = app.take_jobs();
        let tickets: Vec<_> = jobs
            .into_iter()
            .filter_map(|job| match job {
                FetchJob::Detail(ticket) => Some(ticket),
                _ => None,
            })
            .collect();
        let [a, b] = <[_; 2]>::try_from(tickets).unwrap();

        app.apply(FetchOutcome::Detail(b, Ok(Some(details("B")))));
        app.apply(FetchOutcome::Detail(a, Ok(Some(details("A")))));

        assert_eq!(app.selection.pane(), &DetailPane::Ready(details("B")));
    }

    #[test]
    fn selecting_a_marker_recentres_and_keeps_zoom() {
        let mut app = app();
        app.request_route_data();
        let Some(FetchJob::Map { ticket, .. }) = app.take_jobs().pop() else {
            panic!("expected a map job");
        };
        app.apply(FetchOutcome::Map(
            ticket,
            Ok(vec![marker(1, 45.50, -73.57), marker(2, 45.55, -73.60)]),
        ));
        let zoom = app.viewport.zoom();

        app.select_marker(1);

        assert_eq!(app.selected_marker_index, 1);
        assert_eq!(app.viewport.zoom(), zoom);
        assert!((app.viewport.center().latitude - 45.55).abs() < 1e-9);
    }

    #[test]
    fn failed_query_is_reported_for_its_view() {
        let mut app = app();
        app.navigate(Route::Calendar);
        let Some(FetchJob::Calendar(ticket)) = app.take_jobs().pop() else {
            panic!("expected a calendar job");
        };

        app.apply(FetchOutcome::Calendar(
            ticket,
            Err(QueryError::transport("market_editions", "offline")),
        ));

        assert!(app.route_error().is_some_and(|message| message.contains("offline")));
        app.navigate(Route::Map);
        assert!(app.route_error().is_none());
    }
}
