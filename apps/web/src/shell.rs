//! Page state: the current route, the one open edition and a query slot per
//! view. Only this type writes the selection.

use std::rc::Rc;

use chrono::NaiveDate;
use market_core::calendar::{visible_events, CalendarCursor};
use market_core::dates::partition_by_start;
use market_core::{
    CalendarEvent, DateWindow, EditionSummary, FetchJob, FetchOutcome, Load, MapMarker,
    Partitioned, QueryKey, QuerySlot, RecordId, Route, Selection, Viewport,
};
use ratzilla::event::KeyCode;

use crate::source::WebSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    Browser,
    Fixed(NaiveDate),
}

impl Clock {
    /// The browser's local date, read on every call.
    pub fn today(self) -> NaiveDate {
        match self {
            Self::Browser => {
                let now = js_sys::Date::new_0();
                NaiveDate::from_ymd_opt(
                    i32::try_from(now.get_full_year()).unwrap_or(1970),
                    now.get_month() + 1,
                    now.get_date(),
                )
                .unwrap_or(NaiveDate::MIN)
            }
            Self::Fixed(day) => day,
        }
    }
}

pub struct Shell {
    clock: Clock,
    pub route: Route,
    pub selection: Selection,
    pub list: QuerySlot<QueryKey, Vec<EditionSummary>>,
    pub calendar: QuerySlot<QueryKey, Vec<CalendarEvent>>,
    pub map: QuerySlot<QueryKey, Vec<MapMarker>>,
    pub window: DateWindow,
    pub viewport: Viewport,
    pub cursor: CalendarCursor,
    /// Highlighted row in the current view.
    pub row: usize,
    pub source: Option<Rc<WebSource>>,
    pub source_error: Option<String>,
    jobs: Vec<FetchJob>,
}

impl Shell {
    pub fn new(clock: Clock, route: Route) -> Self {
        let today = clock.today();
        let mut shell = Self {
            clock,
            route,
            selection: Selection::new(),
            list: QuerySlot::new(),
            calendar: QuerySlot::new(),
            map: QuerySlot::new(),
            window: DateWindow::starting(today),
            viewport: Viewport::default(),
            cursor: CalendarCursor::new(today),
            row: 0,
            source: None,
            source_error: None,
            jobs: Vec::new(),
        };
        shell.request_route_data();
        shell
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Hands out queued jobs once a source is available.
    pub fn take_jobs(&mut self) -> Option<(Rc<WebSource>, Vec<FetchJob>)> {
        let source = self.source.clone()?;
        if self.jobs.is_empty() {
            return None;
        }
        Some((source, std::mem::take(&mut self.jobs)))
    }

    pub fn navigate(&mut self, route: Route) {
        if self.route != route {
            self.route = route;
            self.row = 0;
        }
        self.request_route_data();
    }

    /// Route change that came from the browser's address rather than a key.
    pub fn follow_path(&mut self, path: &str) {
        self.navigate(Route::from_path(path));
    }

    fn request_route_data(&mut self) {
        let job = match self.route {
            Route::List => self.list.request(QueryKey::List).map(FetchJob::List),
            Route::Calendar => self.calendar.request(QueryKey::Calendar).map(FetchJob::Calendar),
            Route::Map => {
                let window = self.window;
                self.map
                    .request(QueryKey::Map(window))
                    .map(|ticket| FetchJob::Map { ticket, window })
            }
        };
        self.jobs.extend(job);
    }

    pub fn open(&mut self, id: RecordId) {
        if let Some(ticket) = self.selection.select(id) {
            self.jobs.push(FetchJob::Detail(ticket));
        }
    }

    pub fn apply(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::List(ticket, result) => {
                self.list.resolve(ticket, result);
            }
            FetchOutcome::Calendar(ticket, result) => {
                self.calendar.resolve(ticket, result);
            }
            FetchOutcome::Map(ticket, result) => {
                self.map.resolve(ticket, result);
            }
            FetchOutcome::Detail(ticket, result) => {
                self.selection.resolve(ticket, result);
            }
        }
        self.row = self.row.min(self.row_ids().len().saturating_sub(1));
    }

    fn set_window(&mut self, window: DateWindow) {
        if window != self.window {
            self.window = window;
            self.row = 0;
            self.request_route_data();
        }
    }

    pub fn markers(&self) -> &[MapMarker] {
        self.map.state().ready().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Upcoming soonest first, past most recent first.
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

    pub fn visible_events(&self) -> Vec<&CalendarEvent> {
        let events = self.calendar.state().ready().map(Vec::as_slice).unwrap_or(&[]);
        visible_events(&self.cursor, events)
    }

    /// Ids of the current view's rows, in display order.
    pub fn row_ids(&self) -> Vec<RecordId> {
        match self.route {
            Route::Map => self.markers().iter().map(|m| m.id.clone()).collect(),
            Route::Calendar => self.visible_events().iter().map(|e| e.id.clone()).collect(),
            Route::List => {
                let Partitioned { upcoming, past } = self.list_sections();
                upcoming.into_iter().chain(past).map(|e| e.id).collect()
            }
        }
    }

    /// Error text for the current view's query, if it failed.
    pub fn route_error(&self) -> Option<&str> {
        fn failure<T>(state: &Load<T>) -> Option<&str> {
            match state {
                Load::Failed(message) => Some(message),
                _ => None,
            }
        }
        match self.route {
            Route::List => failure(self.list.state()),
            Route::Calendar => failure(self.calendar.state()),
            Route::Map => failure(self.map.state()),
        }
    }

    pub fn handle_key(&mut self, code: &KeyCode) {
        if self.selection.is_open() {
            if matches!(code, KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q' | 'x')) {
                self.selection.close();
            }
            return;
        }

        match code {
            KeyCode::Tab => self.navigate(self.route.next()),
            KeyCode::Char(c @ '1'..='3') => {
                let index = c.to_digit(10).map_or(0, |digit| digit as usize - 1);
                if let Some(route) = Route::from_index(index) {
                    self.navigate(route);
                }
            }
            KeyCode::Up => self.row = self.row.saturating_sub(1),
            KeyCode::Down => {
                let last = self.row_ids().len().saturating_sub(1);
                self.row = (self.row + 1).min(last);
            }
            KeyCode::Enter => {
                if let Some(id) = self.row_ids().get(self.row).cloned() {
                    self.open(id);
                }
            }
            _ => self.handle_route_key(code),
        }
    }

    fn handle_route_key(&mut self, code: &KeyCode) {
        match (self.route, code) {
            (Route::Map, KeyCode::Char('+' | '=')) => self.viewport = self.viewport.zoom_in(),
            (Route::Map, KeyCode::Char('-')) => self.viewport = self.viewport.zoom_out(),
            (Route::Map, KeyCode::Char('[')) => self.set_window(self.window.shift_start(-1)),
            (Route::Map, KeyCode::Char(']')) => self.set_window(self.window.shift_start(1)),
            (Route::Map, KeyCode::Char('{')) => self.set_window(self.window.shift_end(-1)),
            (Route::Map, KeyCode::Char('}')) => self.set_window(self.window.shift_end(1)),
            (Route::Map, KeyCode::Char('c')) => {
                let target = self.markers().get(self.row).map(|m| m.location);
                if let Some(location) = target {
                    self.viewport = self.viewport.center_on(location);
                }
            }
            (Route::Calendar, KeyCode::Left) => {
                self.cursor = self.cursor.previous();
                self.row = 0;
            }
            (Route::Calendar, KeyCode::Right) => {
                self.cursor = self.cursor.next();
                self.row = 0;
            }
            (Route::Calendar, KeyCode::Char('t')) => {
                self.cursor = self.cursor.today(self.today());
                self.row = 0;
            }
            (Route::Calendar, KeyCode::Char('w')) => {
                self.cursor = self.cursor.toggle_mode();
                self.row = 0;
            }
            _ => {}
        }
    }
}
