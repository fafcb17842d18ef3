// UI module for market-maker
// The navigation shell around the three views, plus the modal overlays

pub mod screens;
pub mod widgets;

use crate::app::App;
use crate::ui::widgets::hints::render_help_bar;
use market_core::Route;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Tabs};
use ratatui::Frame;

pub const APP_TITLE: &str = "Market Maker";

pub fn ui(app: &App, f: &mut Frame<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(2),
        ])
        .split(f.area());

    render_nav(app, f, chunks[0]);

    match app.route {
        Route::Map => screens::map::render_map_view(app, f, chunks[1]),
        Route::Calendar => screens::calendar::render_calendar_view(app, f, chunks[1]),
        Route::List => screens::list::render_list_view(app, f, chunks[1]),
    }

    render_help_bar(f, chunks[2], help_pairs(app));

    if app.selection.is_open() {
        screens::detail::render_detail_modal(app, f);
    }
    if app.show_help {
        screens::help::render_help(app.route, f);
    }
}

fn render_nav(app: &App, f: &mut Frame<'_>, area: Rect) {
    let titles = Route::ALL
        .iter()
        .map(|route| TextLine::from(format!(" {} ", route.label())));

    let mut block = Block::default()
        .title(Span::styled(
            APP_TITLE,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL);
    let status = if app.status_message.is_empty() {
        app.backend_label.clone()
    } else {
        app.status_message.clone()
    };
    if !status.is_empty() {
        block = block.title_bottom(TextLine::from(status).right_aligned());
    }

    let tabs = Tabs::new(titles)
        .block(block)
        .select(app.route.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|");
    f.render_widget(tabs, area);
}

fn help_pairs(app: &App) -> &'static [(&'static str, &'static str)] {
    if app.selection.is_open() {
        return &[("Esc", "Close"), ("↑/↓", "Scroll"), ("F1", "Help")];
    }
    match app.route {
        Route::Map => &[
            ("↑/↓", "Marker"),
            ("Enter", "Details"),
            ("+/-", "Zoom"),
            ("[ ] { }", "Dates"),
            ("Tab", "Next view"),
            ("F1", "Help"),
            ("q", "Quit"),
        ],
        Route::Calendar => &[
            ("←/→", "Period"),
            ("w", "Month/Week"),
            ("↑/↓", "Event"),
            ("Enter", "Details"),
            ("Tab", "Next view"),
            ("F1", "Help"),
            ("q", "Quit"),
        ],
        Route::List => &[
            ("↑/↓", "Navigate"),
            ("Enter", "Details"),
            ("r", "Reload"),
            ("Tab", "Next view"),
            ("F1", "Help"),
            ("q", "Quit"),
        ],
    }
}
