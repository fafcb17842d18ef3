use crate::app::App;
use crate::ui::widgets::status::{render_error, render_loading, render_message};
use crate::ui::widgets::tables::scroll_offset;
use chrono::Datelike;
use market_core::calendar::{grid, CalendarMode, DayCell};
use market_core::dates::format_long_raw;
use market_core::Load;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub fn render_calendar_view(app: &App, f: &mut Frame<'_>, area: Rect) {
    let cursor = &app.calendar_cursor;
    let mode = match cursor.mode() {
        CalendarMode::Month => "month",
        CalendarMode::Week => "week",
    };
    let block = Block::default()
        .title(format!("{} ({mode})", cursor.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    match app.calendar.state() {
        Load::Idle | Load::Loading => {
            render_loading(f, inner, &app.throbber, "Loading...");
            return;
        }
        Load::Failed(message) => {
            render_error(f, inner, "the calendar", message);
            return;
        }
        Load::Ready(_) => {}
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(inner);

    render_grid(app, f, chunks[0]);
    render_event_list(app, f, chunks[1]);
}

fn render_grid(app: &App, f: &mut Frame<'_>, area: Rect) {
    let today = app.today();
    let weeks = grid(&app.calendar_cursor, app.calendar_events());
    let week_count = u16::try_from(weeks.len().max(1)).unwrap_or(1);
    let row_height = area.height.saturating_sub(1) / week_count;
    let events_per_cell = usize::from(row_height.saturating_sub(1));

    let header = Row::new(WEEKDAYS.iter().map(|day| Cell::from(*day))).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let rows = weeks.iter().map(|week| {
        Row::new(
            week.iter()
                .map(|cell| Cell::from(day_text(cell, today, events_per_cell))),
        )
        .height(row_height.max(1))
    });

    let table = Table::new(rows, [Constraint::Ratio(1, 7); 7])
        .header(header)
        .column_spacing(1);
    f.render_widget(table, area);
}

fn day_text(cell: &DayCell<'_>, today: chrono::NaiveDate, capacity: usize) -> Text<'static> {
    let number_style = if cell.date == today {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else if cell.in_focus_month {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut lines = vec![TextLine::from(Span::styled(
        cell.date.day().to_string(),
        number_style,
    ))];

    let overflow = cell.events.len().saturating_sub(capacity);
    let shown = if overflow > 0 {
        capacity.saturating_sub(1)
    } else {
        capacity
    };
    lines.extend(cell.events.iter().take(shown).map(|event| {
        TextLine::from(Span::styled(
            event.title.clone(),
            Style::default().fg(Color::Cyan),
        ))
    }));
    if overflow > 0 && capacity > 0 {
        lines.push(TextLine::from(Span::styled(
            format!("+{} more", cell.events.len() - shown),
            Style::default().fg(Color::Gray),
        )));
    }
    Text::from(lines)
}

fn render_event_list(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default().title("Events").borders(Borders::TOP);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let events = app.visible_calendar_events();
    if events.is_empty() {
        render_message(f, inner, "No markets in this period.", Color::Gray);
        return;
    }

    let max_visible_rows = inner.height as usize;
    let offset = scroll_offset(events.len(), max_visible_rows, app.selected_event_index);

    let rows = events
        .iter()
        .enumerate()
        .skip(offset)
        .take(max_visible_rows)
        .map(|(index, event)| {
            let style = if index == app.selected_event_index {
                Style::default()
                    .bg(Color::Rgb(0, 0, 238))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(format_long_raw(&event.start)),
                Cell::from(event.title.clone()),
                Cell::from(event.extended_props.market_name.clone()),
            ])
            .style(style)
        });

    let table = Table::new(
        rows,
        [
            Constraint::Length(20),
            Constraint::Percentage(40),
            Constraint::Percentage(40),
        ],
    )
    .column_spacing(1);
    f.render_widget(table, inner);
}
